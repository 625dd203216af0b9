//! Credential decryption errors.

use thiserror::Error;

/// Malformed or tampered credential payload. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("Failed to decrypt password: shared secret not configured ({0})")]
    MissingKey(String),

    #[error("Failed to decrypt password: invalid shared secret ({0})")]
    InvalidKey(String),

    #[error("Failed to decrypt password: invalid base64 ({0})")]
    InvalidEncoding(String),

    #[error("Failed to decrypt password: payload too short ({0} bytes)")]
    Truncated(usize),

    #[error("Failed to decrypt password: authentication failed")]
    AuthenticationFailed,

    #[error("Failed to decrypt password: plaintext is not UTF-8")]
    InvalidUtf8,
}
