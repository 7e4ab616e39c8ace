use std::path::PathBuf;

use cirrus_core::{CloudinaryCredentials, SignatureAlgorithm};
use cirrus_model::RemotePattern;

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cloudinary: CloudinaryConfig,
    pub cors: CorsConfig,
    /// Allow-list for `secure_url`s returned by the listing endpoint. Empty
    /// means every URL is allowed.
    pub remote_patterns: Vec<RemotePattern>,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Tag used by the listing endpoint when a request names none.
    pub library_tag: Option<String>,
    pub api_base: String,
    pub max_results: u32,
    pub signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("has_api_secret", &self.api_secret.is_some())
            .field("library_tag", &self.library_tag)
            .field("api_base", &self.api_base)
            .field("max_results", &self.max_results)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

impl CloudinaryConfig {
    pub fn credentials(&self) -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: self.cloud_name.clone(),
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }

    pub fn api_secret(&self) -> &str {
        self.api_secret.as_deref().unwrap_or_default()
    }

    pub fn has_api_secret(&self) -> bool {
        !self.api_secret().trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
