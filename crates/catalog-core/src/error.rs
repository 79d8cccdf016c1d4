// ── Core error types ──
//
// User-facing errors from catalog-core. The `From<catalog_api::Error>`
// impl folds transport and envelope failures into a small set of variants
// the views and the CLI can act on. Errors are `Clone` so a single failed
// fetch can be handed to every caller sharing it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the catalog API: {reason}")]
    Network { reason: String },

    // ── Server errors ────────────────────────────────────────────────
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    #[error("Unexpected response from {resource}")]
    EnvelopeMismatch { resource: String },

    // ── Client-side errors ───────────────────────────────────────────
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A view action was requested in a phase that does not allow it.
    #[error("Cannot {action} while {phase}")]
    Busy { action: String, phase: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Http { status: 404, .. })
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::AuthenticationFailed { .. } | Self::Http { status: 401, .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<catalog_api::Error> for CoreError {
    fn from(err: catalog_api::Error) -> Self {
        use catalog_api::Error as Api;

        match err {
            Api::Network(e) => CoreError::Network {
                reason: e.without_url().to_string(),
            },
            Api::Tls(msg) => CoreError::Network {
                reason: format!("TLS error: {msg}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Http { status, message } => CoreError::Http { status, message },
            Api::EnvelopeMismatch { resource } => CoreError::EnvelopeMismatch { resource },
            Api::Deserialization { message, .. } => CoreError::Internal(message),
            Api::Encoding(message) => CoreError::Internal(message),
            Api::Unauthenticated => CoreError::Unauthenticated,
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::SessionStore(message) => CoreError::Config {
                message: format!("Session store: {message}"),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn http_404_counts_as_not_found() {
        let err = CoreError::from(catalog_api::Error::Http {
            status: 404,
            message: "Pricing not found".into(),
        });
        assert!(err.is_not_found());
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn authentication_maps_to_auth_failure() {
        let err = CoreError::from(catalog_api::Error::Authentication {
            message: "Invalid credentials".into(),
        });
        assert_eq!(
            err,
            CoreError::AuthenticationFailed {
                message: "Invalid credentials".into()
            }
        );
        assert!(err.is_auth_failure());
    }
}
