//! JavaScript dialog handling for CDP page session.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// `true` while a JavaScript dialog is showing.
    pub fn dialog_open(&self) -> bool {
        *self.dialog.borrow()
    }

    /// Wait for a dialog to open, then accept it.
    pub async fn accept_dialog(&self, timeout: Duration) -> Result<(), CdpError> {
        let mut dialog = self.dialog.subscribe();
        match tokio::time::timeout(timeout, dialog.wait_for(|open| *open)).await {
            Ok(Ok(_)) => {}
            Ok(Err(_)) => return Err(CdpError::SessionClosed),
            Err(_) => return Err(CdpError::Timeout("No dialog appeared".to_string())),
        }

        self.call(
            "Page.handleJavaScriptDialog",
            Some(json!({"accept": true})),
        )
        .await?;
        self.dialog.send_replace(false);

        debug!("Accepted dialog on session {}", self.session_id);
        Ok(())
    }
}
