//! Error types for the mylist protocol layer.

mod collaborator;
mod credentials;
mod registration;
mod session;

pub use collaborator::*;
pub use credentials::*;
pub use registration::*;
pub use session::*;
