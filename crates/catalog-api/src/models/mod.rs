// ── Wire models ──
//
// Response types mirror the backend's camelCase JSON; request types are
// snake_case and skip `None` fields so updates stay sparse.

mod catalog;
mod entity_id;
mod requests;
mod user;

pub use catalog::{AppVersionPricing, Brand, PriceItem, Pricing, Service};
pub use entity_id::EntityId;
pub use requests::{
    CreateBrandRequest, CreatePricingRequest, CreateServiceRequest, ImageUpload, NewPriceItem,
    UpdateBrandRequest, UpdatePricingRequest, UpdateServiceRequest,
};
pub use user::{Session, SignUpRequest, UpdateUserRequest, User, UserProfile};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

// ── Lenient field decoders ───────────────────────────────────────────

/// `isActive` is omitted by some endpoints; absent means active.
pub(crate) fn active_by_default() -> bool {
    true
}

/// Timestamps that fail to parse as RFC 3339 are dropped instead of failing
/// the whole entity.
pub(crate) fn lenient_timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

/// Prices arrive as JSON numbers or as decimal strings (`"10.00"`).
pub(crate) fn number_or_string<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(de)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// User identifiers are strings on some deployments and numbers on others.
pub(crate) fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(de)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}
