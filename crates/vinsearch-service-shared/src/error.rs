//! JSON error responses.
//!
//! Errors are returned as a single-field object, `{"error": "<message>"}`,
//! with the matching HTTP status. Lookup outcomes such as an invalid VIN or a
//! provider failure are not errors at this layer: they travel inside a 200
//! response's `statut` field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Message returned when the search API key is missing.
pub const ERROR_MISSING_API_KEY: &str = "SERPAPI_KEY not configured";

/// Message returned when the `vin` query parameter is missing or empty.
pub const ERROR_MISSING_VIN: &str = "VIN parameter required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

/// An HTTP error with a JSON `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 500: the service was started without a search API key.
    pub fn missing_api_key() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ERROR_MISSING_API_KEY)
    }

    /// 400: the request did not name a VIN.
    pub fn missing_vin() -> Self {
        Self::new(StatusCode::BAD_REQUEST, ERROR_MISSING_VIN)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The JSON body sent to the client.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.message })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
