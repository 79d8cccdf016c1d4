// ── Catalog facade ──
//
// Entry point for consumers: typed resource reads through the query
// cache, validated mutations that invalidate the affected kind, and the
// session operations. Cheap to clone; all clones share one cache.

use std::sync::Arc;

use catalog_api::{
    ApiClient, AuthClient, AuthState, CatalogEntity, EntityId, ImageUpload, Resource,
    ResourceClient, Session, SessionProvider, SignUpRequest, UpdateUserRequest, User, UserProfile,
    UsersClient,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::error::CoreError;
use crate::query::{QueryCache, QueryKey};
use crate::validate::{self, Validate};

#[derive(Debug, Clone)]
pub struct Catalog {
    api: ApiClient,
    auth: AuthClient,
    users: UsersClient,
    cache: QueryCache,
}

impl Catalog {
    /// Build the HTTP client from `config` around the given token store.
    pub fn new(config: &CatalogConfig, session: Arc<dyn SessionProvider>) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.base_url.clone(), &config.transport(), session)?;
        Ok(Self::with_api(api, QueryCache::new(config.stale_after)))
    }

    /// Wrap an existing client and cache.
    pub fn with_api(api: ApiClient, cache: QueryCache) -> Self {
        Self {
            auth: AuthClient::new(api.clone()),
            users: UsersClient::new(api.clone()),
            api,
            cache,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Uncached typed client for `R`.
    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.api.clone())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Cached `list(page)`. `Some(0)` is the same query as `None`.
    pub async fn list<R: Resource>(
        &self,
        page: Option<u32>,
    ) -> Result<Arc<Vec<R::Entity>>, CoreError> {
        let page = page.filter(|p| *p > 0);
        let client = self.resource::<R>();
        self.cache
            .fetch(QueryKey::List { kind: R::KIND, page }, move || async move {
                Ok(client.list(page).await?)
            })
            .await
    }

    /// Cached `list_by_page(page)`.
    pub async fn list_page<R: Resource>(
        &self,
        page: u32,
    ) -> Result<Arc<Vec<R::Entity>>, CoreError> {
        let client = self.resource::<R>();
        self.cache
            .fetch(QueryKey::Page { kind: R::KIND, page }, move || async move {
                Ok(client.list_by_page(page).await?)
            })
            .await
    }

    /// Cached `get(id)`. A 404 becomes `CoreError::NotFound`.
    pub async fn get<R: Resource>(&self, id: EntityId) -> Result<Arc<R::Entity>, CoreError> {
        let client = self.resource::<R>();
        self.cache
            .fetch(QueryKey::Item { kind: R::KIND, id }, move || async move {
                client
                    .get(id)
                    .await
                    .map_err(|e| not_found_as::<R>(e, id))
            })
            .await
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create<R>(&self, payload: &R::Create) -> Result<R::Entity, CoreError>
    where
        R: Resource,
        R::Create: Validate,
    {
        payload.validate()?;
        let created = self.resource::<R>().create(payload).await?;
        self.cache.invalidate(R::KIND);
        info!(kind = %R::KIND, id = %created.id(), "created");
        Ok(created)
    }

    pub async fn update<R>(&self, id: EntityId, payload: &R::Update) -> Result<R::Entity, CoreError>
    where
        R: Resource,
        R::Update: Validate,
    {
        payload.validate()?;
        let updated = self
            .resource::<R>()
            .update(id, payload)
            .await
            .map_err(|e| not_found_as::<R>(e, id))?;
        self.cache.invalidate(R::KIND);
        info!(kind = %R::KIND, %id, "updated");
        Ok(updated)
    }

    pub async fn delete<R: Resource>(&self, id: EntityId) -> Result<(), CoreError> {
        self.resource::<R>()
            .delete(id)
            .await
            .map_err(|e| not_found_as::<R>(e, id))?;
        self.cache.invalidate(R::KIND);
        info!(kind = %R::KIND, %id, "deleted");
        Ok(())
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        if email.trim().is_empty() {
            return Err(CoreError::validation("email", "is required"));
        }
        let session = self.auth.login(email.trim(), password).await?;
        // Anything cached belonged to the previous operator.
        self.cache.clear();
        if let Some(user) = &session.user {
            self.cache.set(QueryKey::CurrentUser, Some(user.clone()));
        }
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.auth.logout()?;
        self.cache.clear();
        Ok(())
    }

    /// Cached `current_user`. `None` when signed out or the token was
    /// rejected.
    pub async fn current_user(&self) -> Result<Option<User>, CoreError> {
        if self.auth.state() == AuthState::Anonymous {
            self.cache.invalidate_session();
            return Ok(None);
        }
        let auth = self.auth.clone();
        let user = self
            .cache
            .fetch(QueryKey::CurrentUser, move || async move {
                Ok(auth.current_user().await?)
            })
            .await?;
        if user.is_none() {
            debug!("current user unavailable, dropping cached session data");
            self.cache.clear();
        }
        Ok((*user).clone())
    }

    /// Guard for operations that need a signed-in operator.
    pub async fn require_user(&self) -> Result<User, CoreError> {
        self.current_user().await?.ok_or(CoreError::Unauthenticated)
    }

    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), CoreError> {
        validate::password_change(current, new, confirm)?;
        Ok(self.auth.change_password(current, new).await?)
    }

    pub async fn sign_up(
        &self,
        request: &SignUpRequest,
        confirm: &SecretString,
    ) -> Result<Session, CoreError> {
        for (field, value) in [
            ("email", &request.email),
            ("full_name", &request.full_name),
            ("phone", &request.phone),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::validation(field, "is required"));
            }
        }
        validate::new_password(&request.password, confirm)?;
        Ok(self.auth.sign_up(request).await?)
    }

    // ── Staff accounts ───────────────────────────────────────────────

    /// Cached `GET /api/users`.
    pub async fn users(&self) -> Result<Arc<Vec<UserProfile>>, CoreError> {
        let users = self.users.clone();
        self.cache
            .fetch(QueryKey::Users, move || async move { Ok(users.list().await?) })
            .await
    }

    /// Cached `GET /api/users/{id}`. A 404 becomes `CoreError::NotFound`.
    pub async fn profile(&self, id: &str) -> Result<Arc<UserProfile>, CoreError> {
        let users = self.users.clone();
        let owned = id.to_owned();
        self.cache
            .fetch(QueryKey::User { id: id.to_owned() }, move || async move {
                users.get(&owned).await.map_err(|e| user_not_found(e, &owned))
            })
            .await
    }

    pub async fn update_user(
        &self,
        id: &str,
        payload: &UpdateUserRequest,
    ) -> Result<UserProfile, CoreError> {
        payload.validate()?;
        let updated = self
            .users
            .update(id, payload)
            .await
            .map_err(|e| user_not_found(e, id))?;
        self.cache.invalidate_session();
        info!(id, "updated user");
        Ok(updated)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), CoreError> {
        self.users
            .delete(id)
            .await
            .map_err(|e| user_not_found(e, id))?;
        self.cache.invalidate_session();
        info!(id, "deleted user");
        Ok(())
    }

    /// Replace a user's profile picture. Returns the new picture URL when
    /// the server reports one.
    pub async fn upload_user_picture(
        &self,
        id: &str,
        picture: &ImageUpload,
    ) -> Result<Option<String>, CoreError> {
        if picture.bytes.is_empty() {
            return Err(CoreError::validation("picture", "is required"));
        }
        let url = self
            .users
            .upload_picture(id, picture)
            .await
            .map_err(|e| user_not_found(e, id))?;
        self.cache.invalidate_session();
        info!(id, "uploaded user picture");
        Ok(url)
    }
}

fn user_not_found(err: catalog_api::Error, id: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            resource: "user".into(),
            id: id.to_owned(),
        }
    } else {
        err.into()
    }
}

fn not_found_as<R: Resource>(err: catalog_api::Error, id: EntityId) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            resource: R::KIND.singular().to_owned(),
            id: id.to_string(),
        }
    } else {
        err.into()
    }
}
