//! Core data model definitions shared across Cirrus crates.
#![allow(missing_docs)]

pub use ::chrono;

#[cfg(feature = "serde")]
pub mod api;
pub mod cache_key;
pub mod error;
pub mod image;
pub mod resource;

// Intentionally curated re-exports for downstream consumers.
#[cfg(feature = "serde")]
pub use api::{
    MISSING_PARAMS_MESSAGE, ResourcesQuery, ResourcesResponse,
    SignParamsRequest, SignatureResponse,
};
pub use cache_key::{CacheKey, RESOURCES_NAMESPACE};
pub use error::{ModelError, Result as ModelResult};
pub use image::{
    DisplayConstraints, MaxExtent, Orientation, RemotePattern, allowed_by_any,
};
pub use resource::{MediaResource, ResourceCollection};
