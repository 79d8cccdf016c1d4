use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::{lenient_timestamp, string_or_number};

/// The signed-in staff member as reported by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "fullName", alias = "username")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: Option<User>,
}

/// Extended staff profile from `GET /api/users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "username", alias = "full_name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "job_title")]
    pub job_title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default, alias = "picture", alias = "profile_picture")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// New staff account, sent to `POST /api/auth/signup`.
///
/// The backend names the display name `username` and the job title
/// `jobTitle`; the other fields go out as-is.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub phone: String,
    #[serde(rename = "username")]
    pub full_name: String,
    #[serde(rename = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

/// Sparse staff update for `PUT /api/users/{id}`. Same wire names as
/// [`SignUpRequest`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "username", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        serialize_with = "expose_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl UpdateUserRequest {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.phone.is_none()
            && self.job_title.is_none()
            && self.address.is_none()
            && self.about.is_none()
    }
}

fn expose<S: Serializer>(secret: &SecretString, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_opt<S: Serializer>(secret: &Option<SecretString>, ser: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => expose(secret, ser),
        None => ser.serialize_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_accepts_numeric_id_and_name_aliases() {
        let user: User = serde_json::from_value(json!({
            "id": 12,
            "email": "ops@example.com",
            "fullName": "Ops Admin"
        }))
        .unwrap();
        assert_eq!(user.id, "12");
        assert_eq!(user.full_name, "Ops Admin");
        assert!(user.role.is_none());
    }

    #[test]
    fn profile_maps_backend_field_names() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u-1",
            "username": "sara",
            "email": "sara@example.com",
            "jobTitle": "Editor",
            "picture": "/uploads/sara.png",
            "createdAt": "2025-02-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("sara"));
        assert_eq!(profile.job_title.as_deref(), Some("Editor"));
        assert_eq!(profile.image_url.as_deref(), Some("/uploads/sara.png"));
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn sign_up_serializes_password_in_clear() {
        let req = SignUpRequest {
            email: "new@example.com".into(),
            password: SecretString::from("hunter22".to_owned()),
            phone: "0500000000".into(),
            full_name: "New Staff".into(),
            job_title: None,
            address: None,
            about: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["password"], "hunter22");
        assert_eq!(body["username"], "New Staff");
        assert!(body.get("full_name").is_none());
        assert!(body.get("jobTitle").is_none());
    }

    #[test]
    fn sign_up_uses_backend_field_names() {
        let req = SignUpRequest {
            email: "n@e.com".into(),
            password: SecretString::from("hunter22".to_owned()),
            phone: "1".into(),
            full_name: "New Staff".into(),
            job_title: Some("Editor".into()),
            address: None,
            about: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "email": "n@e.com",
                "password": "hunter22",
                "phone": "1",
                "username": "New Staff",
                "jobTitle": "Editor"
            })
        );
    }

    #[test]
    fn user_update_is_sparse_and_renamed() {
        let req = UpdateUserRequest {
            full_name: Some("Sara K".into()),
            job_title: Some("Lead".into()),
            ..UpdateUserRequest::default()
        };
        assert!(!req.is_empty());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "username": "Sara K", "jobTitle": "Lead" })
        );
        assert!(UpdateUserRequest::default().is_empty());
    }
}
