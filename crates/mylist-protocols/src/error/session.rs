//! Browser session errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Browser session closed")]
    Closed,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    /// `true` for errors that say the browser itself is gone.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Closed | SessionError::LaunchFailed(_))
    }
}
