use axum::http::HeaderValue;
use thiserror::Error;

use super::models::{Config, CorsConfig};

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(needle))
    }
}

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(
        "CORS_ALLOWED_ORIGINS contains '*' outside dev mode; list explicit origins or set DEV_MODE=true"
    )]
    DangerousCorsWildcard,
    #[error("invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Checks that cannot be expressed in the types. Anything that keeps the
/// server usable becomes a warning.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }
    validate_cors(&config.cors)?;

    let cloudinary = &config.cloudinary;
    if !cloudinary.has_api_secret() {
        warnings.push_with_hint(
            "CLOUDINARY_API_SECRET is not set; upload signing will fail",
            "Set CLOUDINARY_API_SECRET in the environment or [cloudinary].api_secret in cirrus.toml",
        );
    }
    if cloudinary.cloud_name.is_none() || cloudinary.api_key.is_none() {
        warnings.push_with_hint(
            "Cloudinary cloud name or API key missing; resource listing is disabled",
            "Set CLOUDINARY_CLOUD_NAME and CLOUDINARY_API_KEY",
        );
    }
    if config.remote_patterns.is_empty() {
        warnings.push(
            "No remote image patterns configured; every resource URL will be served",
        );
    }

    Ok(warnings)
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    for origin in &cors.allowed_origins {
        if origin.trim() == "*" {
            continue;
        }
        if HeaderValue::from_str(origin).is_err() {
            return Err(ConfigGuardRailError::InvalidCorsOrigin(
                origin.clone(),
            ));
        }
    }
    Ok(())
}
