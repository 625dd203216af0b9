//! # mylist API
//!
//! The invocation boundary of mylist registration.
//!
//! Every invocation is one JSON request dispatched on its `action`
//! (`register`, `delete_and_create`, `chain_register`) or `health_check`
//! flag, answered with a `{statusCode, body}` pair. [`handle_event`] is the
//! transport-free entry point; [`http`] serves it over axum.

pub mod http;
pub mod invocation;
pub mod response;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use http::routes::create_router;
pub use invocation::handle_event;
pub use response::ApiResponse;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
