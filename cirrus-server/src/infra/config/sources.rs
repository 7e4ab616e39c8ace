use std::path::PathBuf;

use cirrus_model::RemotePattern;
use serde::{Deserialize, Serialize};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cloudinary: FileCloudinaryConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub images: FileImagesConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCloudinaryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileImagesConfig {
    /// Replaces the default pattern derived from the cloud name. An empty
    /// list disables filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_patterns: Option<Vec<RemotePattern>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub library_tag: Option<String>,
    pub api_base: Option<String>,
    pub max_results: Option<u32>,
    pub signature_algorithm: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        // The browser build reads the NEXT_PUBLIC_ names, so accept both.
        let var_or_public = |name: &str| {
            var(name).or_else(|| var(&format!("NEXT_PUBLIC_{name}")))
        };

        Self {
            config_path: var("CIRRUS_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT").and_then(|s| s.parse().ok()),
            cloud_name: var_or_public("CLOUDINARY_CLOUD_NAME"),
            api_key: var_or_public("CLOUDINARY_API_KEY"),
            api_secret: var("CLOUDINARY_API_SECRET"),
            library_tag: var_or_public("CLOUDINARY_LIBRARY_TAG"),
            api_base: var("CLOUDINARY_API_BASE"),
            max_results: var("CLOUDINARY_MAX_RESULTS")
                .and_then(|s| s.parse().ok()),
            signature_algorithm: var("CLOUDINARY_SIGNATURE_ALGORITHM"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw)),
            dev_mode: var("DEV_MODE").and_then(|raw| parse_bool(&raw)),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        EnvConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn reads_public_fallbacks() {
        let config = env(&[
            ("NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "123"),
            ("NEXT_PUBLIC_CLOUDINARY_API_KEY", "ignored"),
            ("NEXT_PUBLIC_CLOUDINARY_LIBRARY_TAG", "library"),
        ]);
        assert_eq!(config.cloud_name.as_deref(), Some("demo"));
        assert_eq!(config.api_key.as_deref(), Some("123"));
        assert_eq!(config.library_tag.as_deref(), Some("library"));
    }

    #[test]
    fn secret_has_no_public_fallback() {
        let config = env(&[("NEXT_PUBLIC_CLOUDINARY_API_SECRET", "leak")]);
        assert_eq!(config.api_secret, None);
    }

    #[test]
    fn parses_lists_flags_and_numbers() {
        let config = env(&[
            ("CORS_ALLOWED_ORIGINS", "https://a.test, ,https://b.test"),
            ("DEV_MODE", "Yes"),
            ("SERVER_PORT", "8080"),
            ("CLOUDINARY_MAX_RESULTS", "not-a-number"),
        ]);
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec!["https://a.test".into(), "https://b.test".into()])
        );
        assert_eq!(config.dev_mode, Some(true));
        assert_eq!(config.server_port, Some(8080));
        assert_eq!(config.max_results, None);
    }
}
