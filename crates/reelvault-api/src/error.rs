//! HTTP error shaping.
//!
//! Every failure leaves the service as `{success: false, error: <message>}`.
//! Input errors carry a specific message naming the invalid value; anything
//! downstream of validation is logged in full server-side and surfaced to
//! the client only as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelvault_ingest::IngestError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Error a handler returns; renders as the JSON failure body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Downstream failure: full detail stays in the logs, the client gets
    /// the route's generic message.
    pub fn internal(err: IngestError, client_message: &str) -> Self {
        tracing::error!(error = %err, "Ingestion request failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: client_message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                error: self.message,
            }),
        )
            .into_response()
    }
}
