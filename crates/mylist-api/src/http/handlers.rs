//! Invocation and health handlers.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::invocation::handle_event;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub request_count: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime().as_secs(),
        request_count: state.request_count(),
    })
}

/// Run one invocation.
///
/// The work runs on its own task, so a caller that disconnects early (chain
/// hand-offs do) does not cancel it.
pub async fn invoke(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResponse {
    let event = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                return ApiResponse::error(400, "Invalid JSON body", Some(e.to_string()));
            }
        }
    };

    let task = tokio::spawn(async move { handle_event(&state, event).await });
    match task.await {
        Ok(response) => response,
        Err(e) => {
            error!("Invocation task failed: {}", e);
            ApiResponse::server_error(format!("Invocation failed: {}", e))
        }
    }
}
