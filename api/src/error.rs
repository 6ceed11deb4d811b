use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Error surface of the HTTP layer. Everything maps to a 500 with an
/// `error` string, optionally carrying structured diagnostic `details`
/// (the test-mail endpoint attaches the relay coordinates).
#[derive(Debug)]
pub struct ApiError {
    message: String,
    details: Option<Value>,
}

impl ApiError {
    pub fn with_details(message: impl Into<String>, details: Value) -> Self {
        Self {
            message: message.into(),
            details: Some(details),
        }
    }
}

impl From<shelfpost::Error> for ApiError {
    fn from(e: shelfpost::Error) -> Self {
        Self {
            message: e.to_string(),
            details: None,
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self {
            message: format!("scan task failed: {e}"),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
