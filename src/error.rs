use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0} is required")]
    MissingArgument(String),

    #[error("{field} must be {expected}")]
    InvalidArgument {
        field: String,
        expected: &'static str,
    },

    #[error("Payment already in progress")]
    PresentationInProgress,

    #[error("Payment cancelled")]
    UserCancelled,

    // The cause is logged, never shown to the caller.
    #[error("Payment error")]
    Serialization(#[source] serde_json::Error),

    #[error("Payment sheet unavailable")]
    SheetUnavailable,

    #[error("Payment callback dropped before a result was delivered")]
    CallbackDropped,

    #[error("Invalid sheet event: {0}")]
    InvalidEvent(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = RelayError> = std::result::Result<T, E>;

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl RelayError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            RelayError::MissingArgument(_) => (StatusCode::BAD_REQUEST, "MISSING_ARGUMENT"),
            RelayError::InvalidArgument { .. } => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            RelayError::InvalidEvent(_) => (StatusCode::BAD_REQUEST, "INVALID_EVENT"),
            RelayError::PresentationInProgress => {
                (StatusCode::CONFLICT, "PRESENTATION_IN_PROGRESS")
            }
            RelayError::UserCancelled => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_CANCELLED"),
            RelayError::SheetUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SHEET_UNAVAILABLE"),
            RelayError::Http(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            RelayError::Serialization(_) | RelayError::CallbackDropped | RelayError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        tracing::error!(
            error = ?self,
            error_code = error_code,
            "Bridge request failed"
        );

        (status, Json(body)).into_response()
    }
}
