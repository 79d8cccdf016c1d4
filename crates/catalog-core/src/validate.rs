// ── Client-side payload validation ──
//
// Checks run before any request is sent. A failure never reaches the
// network and leaves the view's phase and list untouched.

use catalog_api::{
    CreateBrandRequest, CreatePricingRequest, CreateServiceRequest, NewPriceItem,
    UpdateBrandRequest, UpdatePricingRequest, UpdateServiceRequest, UpdateUserRequest,
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A request payload that can be checked locally.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

fn required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

fn required_if_set(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| required(field, v))
}

fn positive_price(price: f64) -> Result<(), CoreError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(CoreError::validation("price", "must be greater than zero"))
    }
}

fn items(items: Option<&[NewPriceItem]>) -> Result<(), CoreError> {
    for (i, item) in items.unwrap_or_default().iter().enumerate() {
        required(&format!("items[{i}].text_ar"), &item.text_ar)?;
        required(&format!("items[{i}].text_en"), &item.text_en)?;
    }
    Ok(())
}

fn order(order: Option<i32>) -> Result<(), CoreError> {
    match order {
        Some(n) if n < 0 => Err(CoreError::validation("order", "must not be negative")),
        _ => Ok(()),
    }
}

impl Validate for CreateServiceRequest {
    fn validate(&self) -> Result<(), CoreError> {
        required("title_ar", &self.title_ar)?;
        required("title_en", &self.title_en)
    }
}

impl Validate for UpdateServiceRequest {
    fn validate(&self) -> Result<(), CoreError> {
        required_if_set("title_ar", self.title_ar.as_deref())?;
        required_if_set("title_en", self.title_en.as_deref())
    }
}

impl Validate for CreatePricingRequest {
    fn validate(&self) -> Result<(), CoreError> {
        required("title_ar", &self.title_ar)?;
        required("title_en", &self.title_en)?;
        positive_price(self.price)?;
        items(self.items.as_deref())
    }
}

impl Validate for UpdatePricingRequest {
    fn validate(&self) -> Result<(), CoreError> {
        required_if_set("title_ar", self.title_ar.as_deref())?;
        required_if_set("title_en", self.title_en.as_deref())?;
        if let Some(price) = self.price {
            positive_price(price)?;
        }
        items(self.items.as_deref())
    }
}

impl Validate for CreateBrandRequest {
    fn validate(&self) -> Result<(), CoreError> {
        if self.image.bytes.is_empty() {
            return Err(CoreError::validation("image", "is required"));
        }
        order(self.order)
    }
}

impl Validate for UpdateBrandRequest {
    fn validate(&self) -> Result<(), CoreError> {
        order(self.order)
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::validation("user", "nothing to update"));
        }
        required_if_set("full_name", self.full_name.as_deref())?;
        required_if_set("email", self.email.as_deref())?;
        required_if_set("phone", self.phone.as_deref())?;
        if let Some(password) = &self.password {
            new_password(password, password)?;
        }
        Ok(())
    }
}

/// Rules for a password change: non-empty current password, a new password
/// of at least six characters, and a matching confirmation.
pub fn password_change(
    current: &SecretString,
    new: &SecretString,
    confirm: &SecretString,
) -> Result<(), CoreError> {
    if current.expose_secret().is_empty() {
        return Err(CoreError::validation("current_password", "is required"));
    }
    new_password(new, confirm)
}

/// Rules for a new account password.
pub fn new_password(new: &SecretString, confirm: &SecretString) -> Result<(), CoreError> {
    if new.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(
            "new_password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if new.expose_secret() != confirm.expose_secret() {
        return Err(CoreError::validation("confirm_password", "does not match"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_api::ImageUpload;

    fn pricing() -> CreatePricingRequest {
        CreatePricingRequest {
            page_number: 1,
            title_ar: "أساسي".into(),
            title_en: "Basic".into(),
            price: 10.0,
            items: None,
        }
    }

    fn field_of(err: CoreError) -> String {
        match err {
            CoreError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn valid_pricing_passes() {
        assert_eq!(pricing().validate(), Ok(()));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut req = pricing();
        req.title_en = "   ".into();
        assert_eq!(field_of(req.validate().unwrap_err()), "title_en");
    }

    #[test]
    fn price_must_be_positive() {
        for price in [0.0, -5.0, f64::NAN] {
            let mut req = pricing();
            req.price = price;
            assert_eq!(field_of(req.validate().unwrap_err()), "price");
        }

        let update = UpdatePricingRequest {
            price: Some(0.0),
            ..Default::default()
        };
        assert_eq!(field_of(update.validate().unwrap_err()), "price");
    }

    #[test]
    fn sparse_update_skips_unset_fields() {
        assert_eq!(UpdatePricingRequest::default().validate(), Ok(()));
        assert_eq!(UpdateServiceRequest::default().validate(), Ok(()));
    }

    #[test]
    fn price_items_need_both_texts() {
        let mut req = pricing();
        req.items = Some(vec![NewPriceItem {
            text_ar: "نطاق".into(),
            text_en: String::new(),
            display_order: None,
        }]);
        assert_eq!(field_of(req.validate().unwrap_err()), "items[0].text_en");
    }

    #[test]
    fn brand_order_cannot_be_negative() {
        let brand = CreateBrandRequest {
            order: Some(-1),
            image: ImageUpload::new("logo.png", "image/png", vec![1]),
        };
        assert_eq!(field_of(brand.validate().unwrap_err()), "order");
    }

    #[test]
    fn password_rules() {
        assert!(password_change(&secret("old"), &secret("abcdef"), &secret("abcdef")).is_ok());
        assert_eq!(
            field_of(password_change(&secret(""), &secret("abcdef"), &secret("abcdef")).unwrap_err()),
            "current_password"
        );
        assert_eq!(
            field_of(password_change(&secret("old"), &secret("abc"), &secret("abc")).unwrap_err()),
            "new_password"
        );
        assert_eq!(
            field_of(password_change(&secret("old"), &secret("abcdef"), &secret("abcdeg")).unwrap_err()),
            "confirm_password"
        );
    }

    #[test]
    fn user_update_rules() {
        assert_eq!(field_of(UpdateUserRequest::default().validate().unwrap_err()), "user");

        let blank_email = UpdateUserRequest {
            email: Some("  ".into()),
            ..UpdateUserRequest::default()
        };
        assert_eq!(field_of(blank_email.validate().unwrap_err()), "email");

        let short_password = UpdateUserRequest {
            password: Some(secret("abc")),
            ..UpdateUserRequest::default()
        };
        assert_eq!(field_of(short_password.validate().unwrap_err()), "new_password");

        let rename = UpdateUserRequest {
            full_name: Some("Sara K".into()),
            ..UpdateUserRequest::default()
        };
        assert!(rename.validate().is_ok());
    }
}
