//! HTTP error responses for the web adapter.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::error::PapertraderError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<PapertraderError> for WebError {
    fn from(err: PapertraderError) -> Self {
        let status = match &err {
            PapertraderError::ConfigParse { .. }
            | PapertraderError::ConfigMissing { .. }
            | PapertraderError::ConfigInvalid { .. }
            | PapertraderError::InvalidConditions { .. } => StatusCode::BAD_REQUEST,
            PapertraderError::NoData { .. } | PapertraderError::DataFetch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PapertraderError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.status.canonical_reason().unwrap_or("error"),
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}
