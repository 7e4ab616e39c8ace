use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cirrus_core::{ProviderError, SignError};
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        if err.is_not_configured() {
            tracing::warn!(error = %err, "media provider not configured");
            return Self::service_unavailable(err.to_string());
        }
        tracing::error!(error = %err, "media provider request failed");
        Self::bad_gateway("Media provider request failed")
    }
}

impl From<SignError> for AppError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::UnsupportedValue { .. } => Self::bad_request(err.to_string()),
            SignError::MissingSecret | SignError::UnknownAlgorithm(_) => {
                tracing::error!(error = %err, "upload signing failed");
                Self::internal("Failed to sign upload parameters")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_gateway_statuses() {
        let unavailable: AppError =
            ProviderError::NotConfigured("API key").into();
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);

        let upstream: AppError = ProviderError::Status {
            status: 401,
            message: "Invalid api_key".into(),
        }
        .into();
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);
        assert!(!upstream.message.contains("api_key"));
    }

    #[test]
    fn sign_errors_split_between_client_and_server() {
        let missing: AppError = SignError::MissingSecret.into();
        assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);

        let nested: AppError = SignError::UnsupportedValue {
            key: "context".into(),
        }
        .into();
        assert_eq!(nested.status, StatusCode::BAD_REQUEST);
    }
}
