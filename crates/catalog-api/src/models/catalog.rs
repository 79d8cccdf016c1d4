use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, active_by_default, lenient_timestamp, number_or_string};

// ── Services ─────────────────────────────────────────────────────────

/// A page card with bilingual title/description and an image.
///
/// Shared by the services, design, development, support, and app-version
/// service families. Support services may omit titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: EntityId,
    pub page_number: u32,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

// ── Pricings ─────────────────────────────────────────────────────────

/// One bullet line of a pricing card, owned by its parent pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Parent key; each pricing family names it differently on the wire.
    #[serde(
        default,
        alias = "pricingId",
        alias = "designPricingId",
        alias = "developmentPricingId",
        alias = "supportPricingId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<EntityId>,
    pub text_ar: String,
    pub text_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A priced plan card for one catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub id: EntityId,
    pub page_number: u32,
    pub title_ar: String,
    pub title_en: String,
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<PriceItem>,
}

/// App-version plan: a pricing with subtitle, billing period and feature text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersionPricing {
    pub id: EntityId,
    pub page_number: u32,
    pub title_ar: String,
    pub title_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_en: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_en: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<PriceItem>,
}

// ── Brands ───────────────────────────────────────────────────────────

/// A partner logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: EntityId,
    #[serde(default)]
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pricing_defaults_and_price_strings() {
        let pricing: Pricing = serde_json::from_value(json!({
            "id": 1,
            "pageNumber": 2,
            "titleAr": "أساسي",
            "titleEn": "Basic",
            "price": "10.00",
            "createdAt": "2025-01-04T09:30:00.000Z",
            "items": [{ "id": 3, "pricingId": 1, "textAr": "نطاق", "textEn": "Domain", "displayOrder": 0 }]
        }))
        .unwrap();

        assert!((pricing.price - 10.0).abs() < f64::EPSILON);
        assert!(pricing.is_active);
        assert!(pricing.created_at.is_some());
        assert_eq!(pricing.items[0].parent_id, Some(EntityId(1)));
    }

    #[test]
    fn child_item_parent_key_aliases() {
        for key in ["designPricingId", "developmentPricingId", "supportPricingId"] {
            let mut raw = json!({ "textAr": "a", "textEn": "b" });
            raw[key] = json!(8);
            let item: PriceItem = serde_json::from_value(raw).unwrap();
            assert_eq!(item.parent_id, Some(EntityId(8)), "alias {key}");
        }
    }

    #[test]
    fn support_service_without_titles() {
        let service: Service = serde_json::from_value(json!({
            "id": 4,
            "pageNumber": 1,
            "img": "/uploads/vpn.png",
            "isActive": false,
            "updatedAt": "not a date"
        }))
        .unwrap();

        assert!(service.title_en.is_empty());
        assert!(!service.is_active);
        assert!(service.updated_at.is_none());
        assert_eq!(service.img.as_deref(), Some("/uploads/vpn.png"));
    }
}
