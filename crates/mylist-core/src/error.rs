//! Errors of the chain and job paths.

use mylist_protocols::{DecryptionError, RegistrationError, TrackerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Tracking failed: {0}")]
    Tracker(#[from] TrackerError),
}

impl ChainError {
    /// `true` when the request itself was unusable.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChainError::Decryption(_))
    }
}
