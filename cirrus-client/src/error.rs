use thiserror::Error;

/// Failures while refreshing a resource listing.
///
/// These never reach code that reads from the store; the synchronizer logs
/// them and keeps serving the last good collection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("failed to decode resource listing: {0}")]
    Decode(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
