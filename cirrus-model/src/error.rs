use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidUrl(url::ParseError),
    InvalidPattern(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidUrl(err) => write!(f, "invalid url: {err}"),
            ModelError::InvalidPattern(msg) => {
                write!(f, "invalid remote pattern: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::InvalidUrl(err) => Some(err),
            ModelError::InvalidPattern(_) => None,
        }
    }
}

impl From<url::ParseError> for ModelError {
    fn from(err: url::ParseError) -> Self {
        ModelError::InvalidUrl(err)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
