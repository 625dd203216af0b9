//! Invocation responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Status code plus JSON body.
///
/// Success bodies are `{message, ...data}`, error bodies `{error, detail?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

impl ApiResponse {
    /// 200 with `message` merged into the fields of `data`.
    pub fn success(message: &str, data: Value) -> Self {
        let mut body = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.insert("message".to_string(), Value::String(message.to_string()));
        Self {
            status_code: 200,
            body: Value::Object(body),
        }
    }

    pub fn error(status_code: u16, error: impl Into<String>, detail: Option<String>) -> Self {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(error.into()));
        if let Some(detail) = detail.filter(|d| !d.is_empty()) {
            body.insert("detail".to_string(), Value::String(detail));
        }
        Self {
            status_code,
            body: Value::Object(body),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::error(400, error, None)
    }

    pub fn server_error(error: impl Into<String>) -> Self {
        Self::error(500, error, None)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}
