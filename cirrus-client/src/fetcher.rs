use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use cirrus_model::{ResourceCollection, ResourcesResponse};
use log::{debug, info, warn};
use reqwest::Client;
use url::Url;

use crate::error::{FetchError, FetchResult};

/// Source of fresh resource listings for the synchronizer.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + fmt::Debug {
    async fn fetch(&self, tag: Option<&str>) -> FetchResult<ResourceCollection>;
}

/// Fetches listings from the gallery server's `GET /api/resources`.
#[derive(Clone)]
pub struct HttpResourceFetcher {
    client: Client,
    base_url: Url,
}

impl fmt::Debug for HttpResourceFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResourceFetcher")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpResourceFetcher {
    pub fn new(base_url: &str) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, base_url)?)
    }

    /// Uses an existing client, e.g. one shared with other requests.
    pub fn with_client(
        client: Client,
        base_url: &str,
    ) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&normalize_base_url(base_url))?;
        info!("[ResourceFetcher] Using gallery server at {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resources_url(&self, tag: Option<&str>) -> FetchResult<Url> {
        let mut url = self.base_url.join("api/resources")?;
        if let Some(tag) = tag {
            url.query_pairs_mut().append_pair("tag", tag);
        }
        Ok(url)
    }
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch(&self, tag: Option<&str>) -> FetchResult<ResourceCollection> {
        let url = self.resources_url(tag)?;
        debug!("[ResourceFetcher] GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "[ResourceFetcher] Listing failed with status {} (tag: {:?})",
                status, tag
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<ResourcesResponse>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        Ok(ResourceCollection::from(body.data))
    }
}

// "localhost:3000" gets a scheme; the trailing slash makes `join` append to
// any path prefix instead of replacing its last segment.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
    if with_scheme != raw.trim().trim_end_matches('/') {
        warn!(
            "[ResourceFetcher] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    format!("{with_scheme}/")
}
