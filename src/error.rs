//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. The
//! matchmaking core never fails (missing entities are no-ops), so these
//! variants only cover the edges: malformed client frames, an engine task
//! that has stopped, and bad configuration.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3002,
///     "message": "matchmaking engine unavailable",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status                 |
/// |-----------|------------|-----------------------------|
/// | 1000–1999 | Validation | 400 Bad Request             |
/// | 3000–3999 | Server     | 500 / 503                   |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A client frame could not be parsed.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The matchmaking engine task is no longer running.
    #[error("matchmaking engine unavailable")]
    EngineUnavailable,

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidMessage(_) => 1001,
            Self::EngineUnavailable => 3002,
            Self::Config(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            Self::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON body of an HTTP error response.
    ///
    /// WebSocket error frames carry the HTTP status instead, see
    /// `WsMessage::error`.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_body(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses() {
        let err = GatewayError::EngineUnavailable;
        assert_eq!(err.error_code(), 3002);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = GatewayError::InvalidMessage("bad".to_string());
        assert_eq!(err.error_code(), 1001);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn into_response_sets_status() {
        let response = GatewayError::Config("LISTEN_ADDR".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_serializes_without_empty_details() {
        let body = GatewayError::InvalidMessage("unknown variant `foo`".to_string()).to_body();
        let Ok(json) = serde_json::to_string(&body) else {
            panic!("serialization failed");
        };
        assert!(json.contains("1001"));
        assert!(json.contains("unknown variant"));
        assert!(!json.contains("details"));
    }
}
