use std::{fmt, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cirrus_model::MediaResource;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::MediaProvider;
use crate::error::{ProviderError, ProviderResult};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
pub const DEFAULT_MAX_RESULTS: u32 = 100;
/// Upper bound the Admin API accepts for `max_results`.
pub const MAX_RESULTS_LIMIT: u32 = 500;

/// Account credentials. Any of them may be missing at startup; calls that
/// need them fail with [`ProviderError::NotConfigured`].
#[derive(Clone, Default)]
pub struct CloudinaryCredentials {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("has_api_secret", &self.api_secret.is_some())
            .finish()
    }
}

impl CloudinaryCredentials {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: Some(cloud_name.into()),
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.require().is_ok()
    }

    fn require(&self) -> ProviderResult<(&str, &str, &str)> {
        let cloud_name = non_empty(&self.cloud_name)
            .ok_or(ProviderError::NotConfigured("cloud name"))?;
        let api_key = non_empty(&self.api_key)
            .ok_or(ProviderError::NotConfigured("API key"))?;
        let api_secret = non_empty(&self.api_secret)
            .ok_or(ProviderError::NotConfigured("API secret"))?;
        Ok((cloud_name, api_key, api_secret))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Lists resources through the provider's Admin API.
#[derive(Clone)]
pub struct CloudinaryProvider {
    client: Client,
    api_base: Url,
    credentials: CloudinaryCredentials,
    max_results: u32,
}

impl fmt::Debug for CloudinaryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryProvider")
            .field("api_base", &self.api_base.as_str())
            .field("credentials", &self.credentials)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl CloudinaryProvider {
    pub fn new(
        credentials: CloudinaryCredentials,
        api_base: &str,
        max_results: u32,
    ) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: Url::parse(api_base)?,
            credentials,
            max_results: max_results.clamp(1, MAX_RESULTS_LIMIT),
        })
    }

    pub fn credentials(&self) -> &CloudinaryCredentials {
        &self.credentials
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// `{base}/v1_1/{cloud}/resources/image[/tags/{tag}]?max_results=N&tags=true`
    pub fn listing_url(
        &self,
        cloud_name: &str,
        tag: Option<&str>,
    ) -> ProviderResult<Url> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::Decode("API base cannot carry a path".into())
            })?;
            segments.pop_if_empty();
            segments.extend(["v1_1", cloud_name, "resources", "image"]);
            if let Some(tag) = tag {
                segments.extend(["tags", tag]);
            }
        }
        url.query_pairs_mut()
            .append_pair("max_results", &self.max_results.to_string())
            .append_pair("tags", "true");
        Ok(url)
    }
}

#[async_trait]
impl MediaProvider for CloudinaryProvider {
    async fn list_resources(
        &self,
        tag: Option<&str>,
    ) -> ProviderResult<Vec<MediaResource>> {
        let (cloud_name, api_key, api_secret) = self.credentials.require()?;
        let url = self.listing_url(cloud_name, tag)?;

        debug!(url = %url, tag = ?tag, "listing provider resources");

        let response = self
            .client
            .get(url)
            .basic_auth(api_key, Some(api_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<AdminErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                });
            warn!(status = status.as_u16(), %message, "provider listing failed");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<AdminListing>()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))?;

        if body.next_cursor.is_some() {
            debug!(
                returned = body.resources.len(),
                "provider listing truncated at max_results"
            );
        }

        Ok(into_media_resources(body))
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_complete()
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[derive(Debug, Deserialize)]
struct AdminListing {
    #[serde(default)]
    resources: Vec<AdminResource>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminResource {
    asset_id: String,
    public_id: String,
    secure_url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdminErrorBody {
    error: AdminErrorMessage,
}

#[derive(Debug, Deserialize)]
struct AdminErrorMessage {
    message: String,
}

fn into_media_resources(listing: AdminListing) -> Vec<MediaResource> {
    let mut resources: Vec<MediaResource> = listing
        .resources
        .into_iter()
        .map(|raw| MediaResource {
            id: raw.asset_id,
            public_id: raw.public_id,
            secure_url: raw.secure_url,
            width: raw.width,
            height: raw.height,
            format: raw.format,
            resource_type: raw.resource_type,
            created_at: raw.created_at,
            tags: raw.tags,
        })
        .collect();

    // Newest first; undated entries keep their relative order at the end.
    resources.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(api_base: &str) -> CloudinaryProvider {
        CloudinaryProvider::new(
            CloudinaryCredentials::new("demo", "key", "secret"),
            api_base,
            DEFAULT_MAX_RESULTS,
        )
        .unwrap()
    }

    #[test]
    fn builds_untagged_listing_url() {
        let url = provider(DEFAULT_API_BASE).listing_url("demo", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudinary.com/v1_1/demo/resources/image?max_results=100&tags=true"
        );
    }

    #[test]
    fn builds_tagged_listing_url_and_escapes_tag() {
        let url = provider("https://api.cloudinary.com/")
            .listing_url("demo", Some("summer trip"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudinary.com/v1_1/demo/resources/image/tags/summer%20trip?max_results=100&tags=true"
        );
    }

    #[test]
    fn clamps_max_results() {
        let provider = CloudinaryProvider::new(
            CloudinaryCredentials::default(),
            DEFAULT_API_BASE,
            10_000,
        )
        .unwrap();
        assert_eq!(provider.max_results(), MAX_RESULTS_LIMIT);
        assert!(!provider.is_configured());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", provider(DEFAULT_API_BASE));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("has_api_secret: true"));
    }

    #[test]
    fn maps_admin_listing_newest_first() {
        let listing: AdminListing = serde_json::from_value(json!({
            "resources": [
                {
                    "asset_id": "old",
                    "public_id": "gallery/old",
                    "secure_url": "https://res.cloudinary.com/demo/image/upload/old.jpg",
                    "width": 800,
                    "height": 600,
                    "format": "jpg",
                    "created_at": "2023-01-01T00:00:00Z"
                },
                {
                    "asset_id": "new",
                    "public_id": "gallery/new",
                    "secure_url": "https://res.cloudinary.com/demo/image/upload/new.jpg",
                    "width": 600,
                    "height": 800,
                    "created_at": "2024-06-01T00:00:00Z",
                    "tags": ["library"]
                }
            ],
            "next_cursor": "abc"
        }))
        .unwrap();

        let resources = into_media_resources(listing);
        let ids: Vec<_> = resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert!(resources[0].has_tag("library"));
    }

    #[tokio::test]
    async fn listing_without_credentials_is_not_configured() {
        let provider = CloudinaryProvider::new(
            CloudinaryCredentials {
                cloud_name: Some("demo".into()),
                api_key: None,
                api_secret: Some("secret".into()),
            },
            DEFAULT_API_BASE,
            DEFAULT_MAX_RESULTS,
        )
        .unwrap();

        let err = provider.list_resources(None).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured("API key")));
    }
}
