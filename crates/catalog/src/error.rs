//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use catalog_config::ConfigError;
use catalog_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the catalog API: {reason}")]
    #[diagnostic(
        code(catalog::connection_failed),
        help(
            "Check that the API is running and that api_url points at it.\n\
             Try: catalog config show"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(code(catalog::not_signed_in), help("Sign in with: catalog auth login"))]
    NotSignedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(catalog::auth_failed),
        help("Check the email and password, then run: catalog auth login")
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(catalog::not_found),
        help("Run: catalog {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(catalog::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from {resource}")]
    #[diagnostic(
        code(catalog::unexpected_response),
        help("The API answered in a shape this client does not understand. Re-run with -vv for details.")
    )]
    UnexpectedResponse { resource: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(catalog::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(catalog::internal))]
    Internal { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(catalog::config),
        help("Inspect the file at `catalog config path` or run: catalog config init")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(catalog::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(catalog::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotSignedIn | Self::AuthFailed { .. } | Self::ApiError { status: 401, .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::ApiError { status: 403, .. } => exit_code::PERMISSION,
            Self::ApiError { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { reason } => Self::ConnectionFailed { reason },
            CoreError::Unauthenticated => Self::NotSignedIn,
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotFound { resource, id } => Self::NotFound {
                list_command: list_command(&resource),
                resource_type: resource,
                identifier: id,
            },
            CoreError::Http { status, message } => Self::ApiError { status, message },
            CoreError::EnvelopeMismatch { resource } => Self::UnexpectedResponse { resource },
            CoreError::Validation { field, message } => Self::Validation {
                field,
                reason: message,
            },
            CoreError::Config { message } => Self::validation("config", message),
            CoreError::Busy { .. } | CoreError::Internal(_) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

/// Command that lists the resource a not-found error names.
fn list_command(resource: &str) -> String {
    if resource == "user" {
        return "users list".into();
    }
    let path = resource.replace("app-version ", "app-version-").replace(' ', "-");
    format!("list {path}s")
}
