//! Registration workflow errors.

use thiserror::Error;

use super::SessionError;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("UI element not ready during {step}: {source}")]
    UiTimeout {
        step: &'static str,
        #[source]
        source: SessionError,
    },

    #[error("Browser session died: {0}")]
    SessionDeath(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RegistrationError {
    /// Classify a session error raised during a structural step.
    pub fn during(step: &'static str, source: SessionError) -> Self {
        if source.is_fatal() {
            RegistrationError::SessionDeath(source.to_string())
        } else {
            RegistrationError::UiTimeout { step, source }
        }
    }
}
