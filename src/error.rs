//! Error types for the gateway
//!
//! Provides the unified error taxonomy using thiserror, with a JSON error
//! envelope rendered through axum's IntoResponse.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

// == Field Error ==
/// One validation failure, tied to the offending field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// == Api Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed client input with per-field detail
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed client input, single message
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Entity absent or not purchasable
    #[error("Not found: {0}")]
    NotFound(String),

    /// Declared request body exceeds the configured ceiling
    #[error("Request body of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// Non-2xx status from a downstream API
    #[error("Upstream responded with status {status}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure talking to a downstream API
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Required credentials or URLs absent; detail stays server-side
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment captured but the commerce-side order update failed
    #[error("Payment captured but order update failed")]
    CaptureIncomplete {
        transaction_id: String,
        woo_error: String,
    },

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation failed",
                    "details": details,
                }),
            ),
            ApiError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid request", "message": message }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not found", "message": message }),
            ),
            ApiError::PayloadTooLarge { size, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({
                    "error": "request body too large",
                    "message": format!("{size} bytes exceeds limit of {limit} bytes"),
                }),
            ),
            // A clean upstream 404 stays a 404.
            ApiError::Upstream { status: 404, .. } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not found" }),
            ),
            // Other upstream 4xx statuses are meaningful to the caller and
            // are relayed with their message; 5xx is an internal concern.
            ApiError::Upstream { status, message } if (400..500).contains(status) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
                json!({ "error": "upstream rejected request", "message": message }),
            ),
            ApiError::Upstream { status, message } => {
                warn!(status, %message, "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "upstream request failed" }),
                )
            }
            ApiError::Network(source) => {
                warn!(error = %source, "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "upstream request failed" }),
                )
            }
            // Full detail is logged here; clients only learn that the
            // service is misconfigured, not which secret is missing.
            ApiError::Configuration(detail) => {
                error!(%detail, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "configuration error" }),
                )
            }
            ApiError::CaptureIncomplete {
                transaction_id,
                woo_error,
            } => (
                StatusCode::MULTI_STATUS,
                json!({
                    "error": "order update failed",
                    "paypalTransactionId": transaction_id,
                    "wooError": woo_error,
                }),
            ),
            ApiError::Internal(message) => {
                error!(%message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, ApiError>;
