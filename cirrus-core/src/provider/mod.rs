//! Access to the hosted media library.

mod cloudinary;

pub use cloudinary::{
    CloudinaryCredentials, CloudinaryProvider, DEFAULT_API_BASE,
    DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};

use std::fmt::Debug;

use async_trait::async_trait;
use cirrus_model::MediaResource;

use crate::error::ProviderResult;

/// Read access to the remote library.
#[async_trait]
pub trait MediaProvider: Send + Sync + Debug {
    /// List image resources, most recent first. With a tag, only resources
    /// carrying that tag are returned.
    async fn list_resources(
        &self,
        tag: Option<&str>,
    ) -> ProviderResult<Vec<MediaResource>>;

    /// Whether the provider has the credentials it needs to answer.
    fn is_configured(&self) -> bool;

    /// Short name for logs and health output.
    fn name(&self) -> &'static str;
}
