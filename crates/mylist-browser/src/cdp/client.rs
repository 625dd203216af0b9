//! CDP WebSocket client.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use super::error::CdpError;
use super::session::PageSession;
use super::transport::Transport;

/// CDP client bound to one browser-level WebSocket.
pub struct CdpClient {
    transport: Arc<Transport>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to the browser endpoint, e.g.
    /// `ws://127.0.0.1:40123/devtools/browser/<id>`.
    pub async fn connect(browser_ws_url: &str, command_timeout: Duration) -> Result<Self, CdpError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport::new(ws_sink, command_timeout));
        let recv_task = tokio::spawn(transport.clone().receive_loop(ws_source));

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            transport,
            recv_task,
        })
    }

    /// `true` once the browser connection is gone.
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Open a blank page and attach a flattened session to it.
    pub async fn open_page(&self) -> Result<PageSession, CdpError> {
        let created = self
            .transport
            .call("Target.createTarget", Some(json!({"url": "about:blank"})), None)
            .await?;
        let target_id = created["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();

        let attached = self
            .transport
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
                None,
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.transport
            .event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(target_id, session_id, self.transport.clone(), event_rx);
        session.enable_domains().await?;

        debug!("Opened page {}", session.target_id());
        Ok(session)
    }

    /// Ask the browser to exit.
    pub async fn close_browser(&self, timeout: Duration) -> Result<(), CdpError> {
        self.transport
            .call_with_timeout("Browser.close", None, None, timeout)
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
