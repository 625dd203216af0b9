//! Input (mouse and keyboard) operations for CDP page session.

use std::future::Future;

use serde_json::json;
use tokio::sync::watch;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at viewport coordinates.
    ///
    /// Returns as soon as a JavaScript dialog opens: the page does not answer
    /// input commands while a dialog is showing.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        let opened = click_unless_dialog(self.dialog.subscribe(), self.press_and_release(x, y))
            .await?;
        if opened {
            debug!("Click at ({}, {}) opened a dialog", x, y);
        } else {
            debug!("Clicked at ({}, {})", x, y);
        }
        Ok(())
    }

    async fn press_and_release(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;

        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }
        Ok(())
    }

    /// Insert text at the focused element.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }
}

/// Run `press` unless a dialog is already showing. Returns `true` when a
/// dialog opened before `press` finished.
pub(super) async fn click_unless_dialog<F>(
    mut dialog: watch::Receiver<bool>,
    press: F,
) -> Result<bool, CdpError>
where
    F: Future<Output = Result<(), CdpError>>,
{
    if *dialog.borrow_and_update() {
        return Err(CdpError::DialogOpen);
    }
    tokio::select! {
        result = press => result.map(|()| false),
        _ = dialog.wait_for(|open| *open) => Ok(true),
    }
}
