//! API error types and handling.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// API error type.
///
/// Only failures at the transport boundary surface here; pipeline and
/// share-link failures are reported inside their JSON response bodies.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body is absent or not a JSON object of the expected shape.
    #[error("Missing JSON payload")]
    MissingPayload(String),

    /// Service unavailable (e.g., metrics exporter not installed).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Parses a request body that must be a JSON object.
    pub fn parse_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::MissingPayload(format!("invalid JSON: {}", e)))?;
        if !value.is_object() {
            return Err(ApiError::MissingPayload(
                "request body is not a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::MissingPayload(format!("unexpected field type: {}", e)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::MissingPayload(detail) = &self {
            warn!(detail = %detail, "Rejecting request body");
        }
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
