// Generic Resource Client
//
// Every catalog entity is served by the same six endpoints under a
// different base path. `ResourceKind` names the path and body codec,
// `Resource` binds a kind to its typed entity and payloads, and
// `ResourceClient<R>` implements the endpoints once.

mod codec;

use std::fmt;
use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Error;
use crate::models::{
    AppVersionPricing, Brand, CreateBrandRequest, CreatePricingRequest, CreateServiceRequest,
    EntityId, ImageUpload, Pricing, Service, UpdateBrandRequest, UpdatePricingRequest,
    UpdateServiceRequest,
};

// ── Kinds ────────────────────────────────────────────────────────────

/// How create/update bodies go over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyCodec {
    Json,
    /// Text fields plus an `image` file part.
    Multipart,
}

/// Every resource the backend exposes. The kebab-case name is the URL path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
    Services,
    DesignServices,
    DevelopmentServices,
    SupportServices,
    AppVersionServices,
    Pricings,
    DesignPricings,
    DevelopmentPricings,
    SupportPricings,
    AppVersionPricings,
    Brands,
}

impl ResourceKind {
    /// Base path below `/api/`.
    pub fn path(self) -> &'static str {
        self.into()
    }

    pub fn codec(self) -> BodyCodec {
        if self.is_pricing() {
            BodyCodec::Json
        } else {
            BodyCodec::Multipart
        }
    }

    pub fn is_pricing(self) -> bool {
        matches!(
            self,
            Self::Pricings
                | Self::DesignPricings
                | Self::DevelopmentPricings
                | Self::SupportPricings
                | Self::AppVersionPricings
        )
    }

    /// Singular noun used in default error messages.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Services => "service",
            Self::DesignServices => "design service",
            Self::DevelopmentServices => "development service",
            Self::SupportServices => "support service",
            Self::AppVersionServices => "app-version service",
            Self::Pricings => "pricing",
            Self::DesignPricings => "design pricing",
            Self::DevelopmentPricings => "development pricing",
            Self::SupportPricings => "support pricing",
            Self::AppVersionPricings => "app-version pricing",
            Self::Brands => "brand",
        }
    }

    /// Plural noun for list failures.
    pub fn label(self) -> String {
        format!("{}s", self.singular())
    }
}

// ── Entity and payload traits ────────────────────────────────────────

/// Accessors every catalog entity shares.
pub trait CatalogEntity: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> EntityId;

    /// Page the entity belongs to. Brands are not paged.
    fn page_number(&self) -> Option<u32> {
        None
    }
}

impl CatalogEntity for Service {
    fn id(&self) -> EntityId {
        self.id
    }

    fn page_number(&self) -> Option<u32> {
        Some(self.page_number)
    }
}

impl CatalogEntity for Pricing {
    fn id(&self) -> EntityId {
        self.id
    }

    fn page_number(&self) -> Option<u32> {
        Some(self.page_number)
    }
}

impl CatalogEntity for AppVersionPricing {
    fn id(&self) -> EntityId {
        self.id
    }

    fn page_number(&self) -> Option<u32> {
        Some(self.page_number)
    }
}

impl CatalogEntity for Brand {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A create or update body. The image, if any, travels outside serde.
pub trait Payload: Serialize + fmt::Debug + Send + Sync {
    fn image(&self) -> Option<&ImageUpload> {
        None
    }
}

impl Payload for CreateServiceRequest {
    fn image(&self) -> Option<&ImageUpload> {
        Some(&self.image)
    }
}

impl Payload for UpdateServiceRequest {
    fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }
}

impl Payload for CreatePricingRequest {}

impl Payload for UpdatePricingRequest {}

impl Payload for CreateBrandRequest {
    fn image(&self) -> Option<&ImageUpload> {
        Some(&self.image)
    }
}

impl Payload for UpdateBrandRequest {
    fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }
}

/// Binds a `ResourceKind` to its wire types.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;
    type Entity: CatalogEntity;
    type Create: Payload;
    type Update: Payload;
}

macro_rules! resources {
    ($($(#[$doc:meta])* $name:ident => $kind:ident, $entity:ty, $create:ty, $update:ty;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Resource for $name {
                const KIND: ResourceKind = ResourceKind::$kind;
                type Entity = $entity;
                type Create = $create;
                type Update = $update;
            }
        )*
    };
}

/// Marker types, one per resource.
pub mod kinds {
    use super::{
        AppVersionPricing, Brand, CreateBrandRequest, CreatePricingRequest, CreateServiceRequest,
        Pricing, Resource, ResourceKind, Service, UpdateBrandRequest, UpdatePricingRequest,
        UpdateServiceRequest,
    };

    resources! {
        Services => Services, Service, CreateServiceRequest, UpdateServiceRequest;
        DesignServices => DesignServices, Service, CreateServiceRequest, UpdateServiceRequest;
        DevelopmentServices => DevelopmentServices, Service, CreateServiceRequest, UpdateServiceRequest;
        SupportServices => SupportServices, Service, CreateServiceRequest, UpdateServiceRequest;
        AppVersionServices => AppVersionServices, Service, CreateServiceRequest, UpdateServiceRequest;
        Pricings => Pricings, Pricing, CreatePricingRequest, UpdatePricingRequest;
        DesignPricings => DesignPricings, Pricing, CreatePricingRequest, UpdatePricingRequest;
        DevelopmentPricings => DevelopmentPricings, Pricing, CreatePricingRequest, UpdatePricingRequest;
        SupportPricings => SupportPricings, Pricing, CreatePricingRequest, UpdatePricingRequest;
        /// Shares the pricing payloads; responses carry the extra plan fields.
        AppVersionPricings => AppVersionPricings, AppVersionPricing, CreatePricingRequest, UpdatePricingRequest;
        Brands => Brands, Brand, CreateBrandRequest, UpdateBrandRequest;
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Typed CRUD client for one resource.
pub struct ResourceClient<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &R::KIND)
            .field("base_url", &self.api.base_url().as_str())
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// `GET /api/{path}`, optionally filtered by `page_number`.
    ///
    /// A page of `0` is treated as no filter.
    pub async fn list(&self, page: Option<u32>) -> Result<Vec<R::Entity>, Error> {
        let mut url = self.api.url(R::KIND.path())?;
        if let Some(page) = page.filter(|p| *p > 0) {
            url.query_pairs_mut()
                .append_pair("page_number", &page.to_string());
        }
        let body = self.fetch(Method::GET, url, "fetch", true).await?;
        let items: Vec<R::Entity> = envelope::list(&body)?;
        debug!(kind = %R::KIND, count = items.len(), "listed");
        Ok(items)
    }

    /// `GET /api/{path}/page/{n}`.
    pub async fn list_by_page(&self, page: u32) -> Result<Vec<R::Entity>, Error> {
        let url = self.api.url(&format!("{}/page/{page}", R::KIND.path()))?;
        let body = self.fetch(Method::GET, url, "fetch", true).await?;
        envelope::list(&body)
    }

    /// `GET /api/{path}/{id}`.
    pub async fn get(&self, id: EntityId) -> Result<R::Entity, Error> {
        let url = self.item_url(id)?;
        let body = self.fetch(Method::GET, url, "fetch", false).await?;
        envelope::single(&body, R::KIND.path())
    }

    /// `POST /api/{path}`.
    pub async fn create(&self, payload: &R::Create) -> Result<R::Entity, Error> {
        let url = self.api.url(R::KIND.path())?;
        let body = self.write(Method::POST, url, payload, "create").await?;
        envelope::single(&body, R::KIND.path())
    }

    /// `PUT /api/{path}/{id}` with only the fields that are set.
    pub async fn update(&self, id: EntityId, payload: &R::Update) -> Result<R::Entity, Error> {
        let url = self.item_url(id)?;
        let body = self.write(Method::PUT, url, payload, "update").await?;
        envelope::single(&body, R::KIND.path())
    }

    /// `DELETE /api/{path}/{id}`. Any 2xx body is accepted.
    pub async fn delete(&self, id: EntityId) -> Result<(), Error> {
        let url = self.item_url(id)?;
        self.fetch(Method::DELETE, url, "delete", false).await?;
        debug!(kind = %R::KIND, %id, "deleted");
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    fn item_url(&self, id: EntityId) -> Result<url::Url, Error> {
        self.api.url(&format!("{}/{id}", R::KIND.path()))
    }

    async fn fetch(
        &self,
        method: Method,
        url: url::Url,
        op: &str,
        plural: bool,
    ) -> Result<String, Error> {
        let resp = self.api.send(self.api.request(method, url)).await?;
        ApiClient::success_body(resp, || default_message(op, R::KIND, plural)).await
    }

    async fn write<P: Payload>(
        &self,
        method: Method,
        url: url::Url,
        payload: &P,
        op: &str,
    ) -> Result<String, Error> {
        let body = codec::encode(R::KIND.codec(), payload)?;
        let builder = body.apply(self.api.request(method, url));
        let resp = self.api.send(builder).await?;
        ApiClient::success_body(resp, || default_message(op, R::KIND, false)).await
    }
}

fn default_message(op: &str, kind: ResourceKind, plural: bool) -> String {
    if plural {
        format!("failed to {op} {}", kind.label())
    } else {
        format!("failed to {op} {}", kind.singular())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_paths_are_kebab_case() {
        assert_eq!(ResourceKind::DesignPricings.path(), "design-pricings");
        assert_eq!(ResourceKind::AppVersionServices.path(), "app-version-services");
        assert_eq!(
            "support-services".parse::<ResourceKind>().ok(),
            Some(ResourceKind::SupportServices)
        );
    }

    #[test]
    fn only_pricings_use_json() {
        for kind in ResourceKind::iter() {
            let expected = if kind.path().ends_with("pricings") {
                BodyCodec::Json
            } else {
                BodyCodec::Multipart
            };
            assert_eq!(kind.codec(), expected, "{kind}");
        }
    }

    #[test]
    fn default_messages_name_the_resource() {
        assert_eq!(
            default_message("fetch", ResourceKind::Brands, true),
            "failed to fetch brands"
        );
        assert_eq!(
            default_message("update", ResourceKind::SupportPricings, false),
            "failed to update support pricing"
        );
    }
}
