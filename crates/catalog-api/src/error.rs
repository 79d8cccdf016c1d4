use thiserror::Error;

/// Top-level error type for the `catalog-api` crate.
///
/// Covers every failure mode of the resource and auth clients:
/// transport, HTTP status, envelope shape, authentication, and the
/// session store. `catalog-core` maps these into user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never produced a response (connection refused, DNS
    /// failure, reset, timeout).
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the error body when the
    /// server supplied one, otherwise it is the operation's default.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// 2xx response whose body is not the expected `{ data: ... }` shape.
    #[error("Unexpected response envelope from {resource}")]
    EnvelopeMismatch { resource: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request payload could not be encoded.
    #[error("Invalid request body: {0}")]
    Encoding(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The operation needs a bearer token and none is stored.
    #[error("Not signed in")]
    Unauthenticated,

    /// Sign-in or sign-up rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Reading or writing the persisted token failed.
    #[error("Session store error: {0}")]
    SessionStore(String),
}

impl Error {
    /// Returns `true` if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Network(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the failure means the session is missing or rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Authentication { .. } | Self::Http { status: 401, .. }
        )
    }

    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
