// Shared HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer-token
// injection from the Session Provider, and uniform failure handling. The
// resource and auth clients are thin layers over the helpers here.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use tracing::{debug, warn};
use url::Url;

use crate::envelope;
use crate::error::Error;
use crate::session::SessionProvider;
use crate::transport::TransportConfig;

/// Cheaply cloneable handle to the backend.
///
/// Every request reads the token from the Session Provider right before it
/// is sent; there is no cached copy to go stale.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("signed_in", &self.inner.session.has_token())
            .finish()
    }
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:4010`); the
    /// `/api` prefix is added per request.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, session))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiInner {
                http,
                base_url,
                session,
            }),
        }
    }

    /// The backend root URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The injected token store.
    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.inner.session
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request, attaching the bearer token if one is stored.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.inner.http.request(method, url);
        match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Start a request that must not carry the stored token.
    pub(crate) fn anonymous(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        self.inner.http.request(method, url)
    }

    /// Send once. Transport failures surface as `Error::Network`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        Ok(builder.send().await?)
    }

    /// Read the body of a 2xx response, or turn anything else into
    /// `Error::Http` with the server's message or `fallback`.
    pub(crate) async fn success_body(
        resp: Response,
        fallback: impl FnOnce() -> String,
    ) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(http_error(status, &body, fallback))
        }
    }
}

/// Normalize a failed response into `Error::Http`.
pub(crate) fn http_error(
    status: reqwest::StatusCode,
    body: &str,
    fallback: impl FnOnce() -> String,
) -> Error {
    let message = envelope::error_message(body).unwrap_or_else(|| {
        if !body.trim().is_empty() {
            let preview: String = body.chars().take(120).collect();
            warn!(%status, body = %preview, "error response without a JSON message");
        }
        fallback()
    });
    Error::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemorySession;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Arc::new(MemorySession::new()),
        )
    }

    #[test]
    fn url_joins_api_prefix() {
        assert_eq!(
            client("http://localhost:4010").url("pricings").unwrap().as_str(),
            "http://localhost:4010/api/pricings"
        );
        assert_eq!(
            client("http://localhost:4010/").url("/auth/me").unwrap().as_str(),
            "http://localhost:4010/api/auth/me"
        );
    }

    #[test]
    fn http_error_falls_back_to_default_message() {
        let err = http_error(reqwest::StatusCode::BAD_GATEWAY, "<html/>", || {
            "failed to delete brand".into()
        });
        assert!(
            matches!(err, Error::Http { status: 502, ref message } if message == "failed to delete brand")
        );
    }
}
