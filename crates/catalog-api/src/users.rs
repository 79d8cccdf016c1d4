// Staff accounts
//
// `/api/users` management: listing, lookup, sparse updates, removal and
// profile pictures. Every call carries the operator's bearer token.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::models::{ImageUpload, UpdateUserRequest, UserProfile};

/// Multipart field name for an uploaded profile picture.
const PICTURE_FIELD: &str = "picture";

#[derive(Debug, Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /api/users`.
    pub async fn list(&self) -> Result<Vec<UserProfile>, Error> {
        let url = self.api.url("users")?;
        let body = self.call(self.api.request(Method::GET, url), "fetch users").await?;
        let users: Vec<UserProfile> = envelope::list(&body)?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// `GET /api/users/{id}`.
    pub async fn get(&self, id: &str) -> Result<UserProfile, Error> {
        let url = self.user_url(id, "")?;
        let body = self.call(self.api.request(Method::GET, url), "fetch user").await?;
        envelope::single(&body, "users")
    }

    /// `PUT /api/users/{id}` with only the fields that are set.
    pub async fn update(&self, id: &str, payload: &UpdateUserRequest) -> Result<UserProfile, Error> {
        let url = self.user_url(id, "")?;
        let builder = self.api.request(Method::PUT, url).json(payload);
        let body = self.call(builder, "update user").await?;
        envelope::single(&body, "users")
    }

    /// `DELETE /api/users/{id}`. Any 2xx body is accepted.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.user_url(id, "")?;
        self.call(self.api.request(Method::DELETE, url), "delete user")
            .await?;
        debug!(id, "deleted user");
        Ok(())
    }

    /// `POST /api/users/{id}/upload-picture` as multipart `picture`.
    ///
    /// Returns `data.picture_url` when the server reports one.
    pub async fn upload_picture(
        &self,
        id: &str,
        picture: &ImageUpload,
    ) -> Result<Option<String>, Error> {
        let url = self.user_url(id, "/upload-picture")?;
        let part = Part::bytes(picture.bytes.clone())
            .file_name(picture.file_name.clone())
            .mime_str(&picture.mime)
            .map_err(|e| Error::Encoding(format!("invalid image MIME type: {e}")))?;
        let builder = self
            .api
            .request(Method::POST, url)
            .multipart(Form::new().part(PICTURE_FIELD, part));
        let body = self.call(builder, "upload picture").await?;

        if body.trim().is_empty() {
            return Ok(None);
        }
        let value = envelope::parse(&body)?;
        Ok(value
            .pointer("/data/picture_url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(str::to_owned))
    }

    fn user_url(&self, id: &str, suffix: &str) -> Result<url::Url, Error> {
        self.api.url(&format!("users/{id}{suffix}"))
    }

    async fn call(&self, builder: reqwest::RequestBuilder, op: &str) -> Result<String, Error> {
        let resp = self.api.send(builder).await?;
        ApiClient::success_body(resp, || format!("failed to {op}")).await
    }
}
