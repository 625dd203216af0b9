//! Browser session protocol definitions.
//!
//! A session is one authenticated, stateful browser instance. It is the unit
//! of concurrency and of failure isolation: whoever opens a session owns it
//! and must `close` it on every exit path.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::types::Locator;

/// Core trait for browser sessions.
///
/// Every operation blocks at most for its timeout and fails with
/// [`SessionError::Timeout`] or [`SessionError::ElementNotFound`] when the
/// page never reaches the expected state.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to a URL and wait for the page to load.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Wait until the element is visible.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError>;

    /// Wait until the element is visible, then click it.
    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError>;

    /// Wait until the element is visible, clear it and type `text`.
    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), SessionError>;

    /// Wait until the element is visible and return its trimmed text.
    async fn read_text(&self, locator: &Locator, timeout: Duration)
        -> Result<String, SessionError>;

    /// Check whether the element currently exists, without waiting.
    async fn is_present(&self, locator: &Locator) -> Result<bool, SessionError>;

    /// Wait for a JavaScript alert/confirm dialog and accept it.
    async fn accept_dialog(&self, timeout: Duration) -> Result<(), SessionError>;

    /// Capture the current viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>, SessionError>;

    /// Liveness probe: `false` once the browser stopped responding.
    async fn is_alive(&self) -> bool;

    /// Release the browser. Must be idempotent.
    async fn close(&self) -> Result<(), SessionError>;
}

/// Opens new, independent browser sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a fresh session. The caller owns the returned handle.
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}
