//! CDP error types.

use mylist_protocols::SessionError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The browser connection is gone.
    #[error("Session closed")]
    SessionClosed,

    /// A JavaScript dialog is blocking the page.
    #[error("A dialog is already open")]
    DialogOpen,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => CdpError::SessionClosed,
            other => CdpError::WebSocket(other.to_string()),
        }
    }
}

impl From<CdpError> for SessionError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Timeout(msg) => SessionError::Timeout(msg),
            CdpError::NavigationFailed(msg) => SessionError::NavigationFailed(msg),
            CdpError::SessionClosed | CdpError::WebSocket(_) => SessionError::Closed,
            CdpError::ConnectionFailed(msg) => SessionError::LaunchFailed(msg),
            other => SessionError::Protocol(other.to_string()),
        }
    }
}
