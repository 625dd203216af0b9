//! Errors raised by best-effort collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),

    #[error("Notification request failed: {0}")]
    Request(String),

    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum ChainInvocationError {
    #[error("Continuation endpoint not configured")]
    NotConfigured,

    #[error("Failed to serialize continuation: {0}")]
    Serialization(String),

    #[error("Continuation request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid marker component: {0}")]
    InvalidMarker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Screenshot capture failed: {0}")]
    Capture(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
