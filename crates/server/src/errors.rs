use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

/// JSON error payload: an `error` title, optional `details`, and
/// endpoint-specific extra keys (`duplicateEmail`, `received`, ...).
///
/// 4xx detail is always emitted so the caller can correct the request; 5xx
/// detail is gated behind development mode to avoid leaking internals.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    error: String,
    details: Option<Value>,
    extra: Vec<(&'static str, Value)>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Option<Value>) -> Self {
        Self { status, error: error.into(), details, extra: Vec::new() }
    }

    /// Attach an endpoint-specific key to the error body.
    pub fn with(mut self, key: &'static str, value: Value) -> Self {
        self.extra.push((key, value));
        self
    }

    pub fn internal(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error,
            Some(Value::String(detail.into())),
        )
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, "request failed");
        }
        let mut body = json!({ "error": self.error });
        let show_details = self.status.is_client_error() || common::env::is_development();
        if show_details {
            if let Some(details) = self.details {
                body["details"] = details;
            }
        }
        for (key, value) in self.extra {
            body[key] = value;
        }
        (self.status, Json(body)).into_response()
    }
}
