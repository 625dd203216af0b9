//! [`BrowserSession`] over a dedicated Chrome process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mylist_protocols::{BrowserSession, Locator, SessionError};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cdp::{CdpClient, CdpError, ElementProbe, PageSession, ScreenshotFormat};
use crate::launcher::ChromeProcess;
use crate::locator_js;

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);
const BROWSER_CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// One Chrome process, one page, driven over CDP.
pub struct CdpBrowserSession {
    page: PageSession,
    client: CdpClient,
    process: Mutex<Option<ChromeProcess>>,
    page_load_timeout: Duration,
    closed: AtomicBool,
}

impl CdpBrowserSession {
    pub(crate) fn new(
        client: CdpClient,
        page: PageSession,
        process: ChromeProcess,
        page_load_timeout: Duration,
    ) -> Self {
        Self {
            page,
            client,
            process: Mutex::new(Some(process)),
            page_load_timeout,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed.load(Ordering::SeqCst) || self.page.is_closed() {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    /// Poll until the element is visible and return its center.
    async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
        reveal: bool,
    ) -> Result<ElementProbe, SessionError> {
        self.ensure_open()?;
        let script = locator_js::probe(locator, reveal);
        let start = Instant::now();
        let mut seen = false;

        loop {
            match self.page.evaluate(&script).await {
                Ok(value) if !value.is_null() => {
                    seen = true;
                    if let Ok(probe) = serde_json::from_value::<ElementProbe>(value) {
                        if probe.visible {
                            return Ok(probe);
                        }
                    }
                }
                Ok(_) => {}
                // Execution contexts come and go while the page navigates.
                Err(CdpError::JavaScript(msg)) => debug!("Probe for {} failed: {}", locator, msg),
                Err(CdpError::Protocol { message, .. }) => {
                    debug!("Probe for {} failed: {}", locator, message)
                }
                Err(e) => return Err(e.into()),
            }

            if start.elapsed() > timeout {
                return Err(if seen {
                    SessionError::Timeout(format!("{} never became visible", locator))
                } else {
                    SessionError::ElementNotFound(locator.to_string())
                });
            }

            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserSession for CdpBrowserSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.page.navigate(url, self.page_load_timeout).await?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError> {
        self.wait_visible(locator, timeout, false).await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> Result<(), SessionError> {
        let probe = self.wait_visible(locator, timeout, true).await?;
        self.page.click(probe.x, probe.y).await?;
        debug!("Clicked {}", locator);
        Ok(())
    }

    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        self.wait_visible(locator, timeout, true).await?;
        let focused = self
            .page
            .evaluate(&locator_js::focus_and_clear(locator))
            .await?;
        if focused.as_bool() != Some(true) {
            return Err(SessionError::ElementNotFound(locator.to_string()));
        }
        self.page.insert_text(text).await?;
        Ok(())
    }

    async fn read_text(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<String, SessionError> {
        self.wait_visible(locator, timeout, false).await?;
        let value = self.page.evaluate(&locator_js::text(locator)).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SessionError::ElementNotFound(locator.to_string()))
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool, SessionError> {
        self.ensure_open()?;
        match self.page.evaluate(&locator_js::exists(locator)).await {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(CdpError::JavaScript(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn accept_dialog(&self, timeout: Duration) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.page.accept_dialog(timeout).await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        self.ensure_open()?;
        Ok(self.page.screenshot(ScreenshotFormat::Png).await?)
    }

    async fn is_alive(&self) -> bool {
        if self.ensure_open().is_err() {
            return false;
        }
        // A showing dialog blocks script evaluation without the page being dead.
        if self.page.dialog_open() {
            return true;
        }
        self.page
            .evaluate_with_timeout("document.readyState", LIVENESS_TIMEOUT)
            .await
            .is_ok()
    }

    async fn close(&self) -> Result<(), SessionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if !self.client.is_closed() {
            if let Err(e) = self.client.close_browser(BROWSER_CLOSE_TIMEOUT).await {
                debug!("Browser.close failed: {}", e);
            }
        }

        if let Some(mut process) = self.process.lock().await.take() {
            info!("Closing Chrome session (PID {:?})", process.pid());
            process.shutdown().await;
        }
        Ok(())
    }
}
