//! HTTP interface module.
//!
//! Provides:
//! - `POST /` and `POST /invoke` for invocations
//! - `GET /health` for probes

pub mod handlers;
pub mod routes;
