//! HTTP route definitions.
//!
//! ```text
//! POST /        - Invocation
//! POST /invoke  - Invocation (alias)
//! GET  /health  - Health check
//! ```

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{health, invoke};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(invoke))
        .route("/invoke", post(invoke))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
