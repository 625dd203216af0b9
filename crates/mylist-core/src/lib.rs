//! # mylist Core
//!
//! The registration engine: a browser-driving [`RegistrationWorkflow`], a
//! [`RetryCoordinator`] that owns one session per attempt, a
//! [`ChunkedDispatcher`] that fans a list out over bounded parallel
//! sessions, and a [`ChainContinuation`] that splits long lists into
//! independently invoked batches.

mod chain;
mod dispatcher;
mod error;
mod job;
mod registrar;
mod retry;
mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::{ChainContinuation, ChainProgress, ChainStepReport};
pub use dispatcher::{partition, ChunkedDispatcher, DispatchReport, WorkerFailure};
pub use error::ChainError;
pub use job::{BatchRun, TrackedJob, TrackedJobReport};
pub use registrar::{BrowserRegistrar, PlaylistRegistrar};
pub use retry::RetryCoordinator;
pub use workflow::{PageLocators, RegistrationWorkflow, WorkflowTimeouts};
