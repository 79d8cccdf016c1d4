// ── Runtime client configuration ──
//
// Describes *where* the backend lives and how reads are cached. Never
// touches disk: catalog-config (or a test) builds one and hands it in.

use std::time::Duration;

use catalog_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Default staleness window for cached reads.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_DEV_URL: &str = "http://localhost:4010";
pub const DEFAULT_PROD_URL: &str = "http://103.195.102.76:4010";

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Backend root, without the `/api` prefix.
    pub base_url: Url,
    pub tls: TlsMode,
    /// `None` keeps the HTTP client's default (no timeout).
    pub timeout: Option<Duration>,
    /// Cached reads older than this are served and refetched in the background.
    pub stale_after: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsMode::System,
            timeout: None,
            stale_after: DEFAULT_STALE_AFTER,
        }
    }

    /// Parse `base_url`, reporting a config error instead of a URL error.
    pub fn from_url(base_url: &str) -> Result<Self, CoreError> {
        let url = Url::parse(base_url).map_err(|e| CoreError::Config {
            message: format!("invalid API URL {base_url:?}: {e}"),
        })?;
        Ok(Self::new(url))
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}
