// catalog-api: Async Rust client for the catalog admin REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resource;
pub mod session;
pub mod transport;
pub mod users;

mod envelope;

pub use auth::{AuthClient, AuthState};
pub use client::ApiClient;
pub use error::Error;
pub use models::{
    AppVersionPricing, Brand, CreateBrandRequest, CreatePricingRequest, CreateServiceRequest,
    EntityId, ImageUpload, NewPriceItem, PriceItem, Pricing, Service, Session, SignUpRequest,
    UpdateBrandRequest, UpdatePricingRequest, UpdateServiceRequest, UpdateUserRequest, User,
    UserProfile,
};
pub use resource::{
    BodyCodec, CatalogEntity, Payload, Resource, ResourceClient, ResourceKind, kinds,
};
pub use session::{FileSession, MemorySession, SessionProvider};
pub use transport::{TlsMode, TransportConfig};
pub use users::UsersClient;
