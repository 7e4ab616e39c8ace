use thiserror::Error;

/// Failures while computing an upload signature.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("API secret is not configured")]
    MissingSecret,

    #[error("parameter '{key}' has an unsupported value type")]
    UnsupportedValue { key: String },

    #[error("unknown signature algorithm '{0}'")]
    UnknownAlgorithm(String),
}

/// Failures while talking to the hosted media provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("media provider is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Missing credentials rather than a failed request.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, ProviderError::NotConfigured(_))
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
