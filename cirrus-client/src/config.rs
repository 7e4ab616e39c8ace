use std::env;

use cirrus_model::ResourceCollection;

use crate::sync::SyncOptions;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the client finds the gallery server and which library tag it shows
/// when a view does not name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_tag: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_tag: None,
        }
    }
}

impl ClientConfig {
    /// Reads `CIRRUS_BASE_URL` and `CLOUDINARY_LIBRARY_TAG` (or its
    /// `NEXT_PUBLIC_` twin).
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            base_url: read("CIRRUS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_tag: read("CLOUDINARY_LIBRARY_TAG")
                .or_else(|| read("NEXT_PUBLIC_CLOUDINARY_LIBRARY_TAG")),
        }
    }

    /// Options for a synchronizer over the default tag.
    pub fn sync_options(&self, initial: ResourceCollection) -> SyncOptions {
        SyncOptions {
            initial_resources: Some(initial),
            tag: self.default_tag.clone(),
            disable_fetch: false,
        }
    }
}
