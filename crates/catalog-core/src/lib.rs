//! Data layer between `catalog-api` and its consumers.
//!
//! - **[`Catalog`]** is the facade: cached typed reads, validated mutations
//!   that invalidate the affected resource kind, session operations and
//!   staff account management.
//! - **[`QueryCache`]** is a keyed stale-while-revalidate cache that shares
//!   in-flight fetches and ignores results from before an invalidation.
//! - **[`ManagementView`]** is the headless admin screen for one resource:
//!   page filter, loaded list, dialog phase, and a `watch` channel of
//!   [`ViewSnapshot`]s.
//! - **[`pages`]** lists the public pages each service family renders on.

pub mod catalog;
pub mod config;
pub mod error;
pub mod pages;
pub mod paging;
pub mod query;
pub mod validate;
pub mod view;

pub use catalog::Catalog;
pub use config::{CatalogConfig, DEFAULT_DEV_URL, DEFAULT_PROD_URL, DEFAULT_STALE_AFTER};
pub use error::CoreError;
pub use pages::CatalogPage;
pub use paging::{ListQuery, PageSlice, Searchable};
pub use query::{QueryCache, QueryKey};
pub use validate::Validate;
pub use view::{ManagementView, Phase, ViewSnapshot};

// Re-export the API types consumers need alongside the core.
pub use catalog_api::{
    AppVersionPricing, AuthState, Brand, CatalogEntity, CreateBrandRequest, CreatePricingRequest,
    CreateServiceRequest, EntityId, FileSession, ImageUpload, MemorySession, NewPriceItem,
    PriceItem, Pricing, Resource, ResourceKind, Service, SessionProvider, SignUpRequest,
    UpdateBrandRequest, UpdatePricingRequest, UpdateServiceRequest, UpdateUserRequest, User,
    UserProfile, kinds,
};
