//! Core session struct and CDP command dispatch.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{events, CdpResponse, ScreenshotFormat};
use crate::cdp::transport::Transport;

/// A session attached to a single page/target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    pub(super) transport: Arc<Transport>,
    /// `true` while a JavaScript dialog blocks the page.
    pub(super) dialog: Arc<watch::Sender<bool>>,
    event_task: tokio::task::JoinHandle<()>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        transport: Arc<Transport>,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        let dialog = Arc::new(watch::Sender::new(false));
        let event_task = tokio::spawn(Self::event_pump(event_rx, dialog.clone()));
        Self {
            target_id,
            session_id,
            transport,
            dialog,
            event_task,
        }
    }

    /// Track page events that change how commands behave.
    async fn event_pump(
        mut event_rx: mpsc::UnboundedReceiver<CdpResponse>,
        dialog_tx: Arc<watch::Sender<bool>>,
    ) {
        while let Some(event) = event_rx.recv().await {
            match event.method.as_deref() {
                Some(events::DIALOG_OPENING) => {
                    let kind = event
                        .params
                        .as_ref()
                        .and_then(|p| p["type"].as_str())
                        .unwrap_or("dialog");
                    debug!("JavaScript {} opened", kind);
                    dialog_tx.send_replace(true);
                }
                Some(events::DIALOG_CLOSED) => {
                    dialog_tx.send_replace(false);
                }
                Some(events::TARGET_CRASHED) => {
                    warn!("Page target crashed");
                }
                _ => {}
            }
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// `true` once the underlying connection is gone.
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Send a CDP command with an explicit timeout.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, CdpError> {
        self.transport
            .call_with_timeout(method, params, Some(&self.session_id), timeout)
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Inspector.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Capture the viewport and return the decoded image bytes.
    pub async fn screenshot(&self, format: ScreenshotFormat) -> Result<Vec<u8>, CdpError> {
        let result = self
            .call(
                "Page.captureScreenshot",
                Some(json!({
                    "format": format,
                    "captureBeyondViewport": false,
                })),
            )
            .await?;

        let data = result["data"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))?;

        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| CdpError::InvalidResponse(format!("Screenshot data: {}", e)))
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}
