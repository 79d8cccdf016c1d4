// Auth Client
//
// Bearer-token sign-in against `/api/auth/*`. The token is persisted through
// the Session Provider; its presence is the whole client-side auth state.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::models::{Session, SignUpRequest, User};

/// Authentication state derived from token presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Sign-in, sign-out and current-user lookups.
#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn state(&self) -> AuthState {
        if self.api.session().has_token() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// `POST /api/auth/signin`. On success the token is stored and the
    /// client becomes `Authenticated`.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, Error> {
        let url = self.api.url("auth/signin")?;
        debug!(email, "signing in");

        let builder = self.api.anonymous(Method::POST, url).json(&json!({
            "email": email,
            "password": password.expose_secret(),
        }));
        let body = self.credentials_body(builder, "login failed").await?;
        let session = parse_session(&body)?;

        self.api.session().set_token(session.token.clone())?;
        info!(email, "signed in");
        Ok(session)
    }

    /// `POST /api/auth/signup`. Creates a staff account without touching the
    /// current operator's stored token.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, Error> {
        let url = self.api.url("auth/signup")?;
        debug!(email = %request.email, "signing up");

        let builder = self.api.anonymous(Method::POST, url).json(request);
        let body = self.credentials_body(builder, "sign-up failed").await?;
        parse_session(&body)
    }

    /// Forget the stored token. No server call.
    pub fn logout(&self) -> Result<(), Error> {
        self.api.session().clear_token()?;
        info!("signed out");
        Ok(())
    }

    /// `GET /api/auth/me`.
    ///
    /// Returns `None` without a request when no token is stored. A 401 clears
    /// the token (soft-logout); any other failure is reported and the token
    /// is kept.
    pub async fn current_user(&self) -> Result<Option<User>, Error> {
        if !self.api.session().has_token() {
            return Ok(None);
        }

        let url = self.api.url("auth/me")?;
        let resp = self.api.send(self.api.request(Method::GET, url)).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            info!("session rejected by server, signing out");
            self.api.session().clear_token()?;
            return Ok(None);
        }

        let body = ApiClient::success_body(resp, || "failed to fetch current user".into()).await?;
        let value = envelope::parse(&body)?;
        let user = value
            .pointer("/data/user")
            .or_else(|| value.get("data"))
            .or_else(|| value.get("user"))
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| Error::EnvelopeMismatch {
                resource: "auth/me".into(),
            })?;

        serde_json::from_value(user)
            .map(Some)
            .map_err(|_| Error::EnvelopeMismatch {
                resource: "auth/me".into(),
            })
    }

    /// `PUT /api/auth/change-password`. Requires a stored token.
    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<(), Error> {
        if !self.api.session().has_token() {
            return Err(Error::Unauthenticated);
        }

        let url = self.api.url("auth/change-password")?;
        let builder = self.api.request(Method::PUT, url).json(&json!({
            "currentPassword": current.expose_secret(),
            "newPassword": new.expose_secret(),
        }));
        let resp = self.api.send(builder).await?;
        ApiClient::success_body(resp, || "failed to change password".into()).await?;
        info!("password changed");
        Ok(())
    }

    async fn credentials_body(
        &self,
        builder: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<String, Error> {
        let resp = self.api.send(builder).await?;
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = envelope::error_message(&body).unwrap_or_else(|| fallback.to_owned());
        debug!(%status, %message, "credentials rejected");
        Err(Error::Authentication { message })
    }
}

/// Read `{ data: { token, user } }` or the flat `{ token, user }` form.
fn parse_session(body: &str) -> Result<Session, Error> {
    let value = envelope::parse(body)?;
    let scope = value.get("data").filter(|d| d.is_object()).unwrap_or(&value);

    let token = scope
        .get("token")
        .or_else(|| value.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Authentication {
            message: "server response did not include a token".into(),
        })?;

    let user = scope
        .get("user")
        .or_else(|| value.get("user"))
        .and_then(|u| serde_json::from_value::<User>(u.clone()).ok());

    Ok(Session {
        token: SecretString::from(token.to_owned()),
        user,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_from_data_envelope() {
        let session = parse_session(
            r#"{"data":{"token":"abc","user":{"id":1,"email":"a@b.c","fullName":"A"}}}"#,
        )
        .unwrap();
        assert_eq!(session.token.expose_secret(), "abc");
        assert_eq!(session.user.unwrap().email, "a@b.c");
    }

    #[test]
    fn session_from_flat_body() {
        let session = parse_session(r#"{"token":"xyz"}"#).unwrap();
        assert_eq!(session.token.expose_secret(), "xyz");
        assert!(session.user.is_none());
    }

    #[test]
    fn session_without_token_is_an_auth_error() {
        assert!(matches!(
            parse_session(r#"{"data":{"user":null}}"#),
            Err(Error::Authentication { .. })
        ));
    }
}
