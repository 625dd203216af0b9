//! Session factory launching one Chrome per session.

use async_trait::async_trait;
use mylist_config::BrowserConfig;
use mylist_protocols::{BrowserSession, SessionError, SessionFactory};
use tracing::info;

use crate::cdp::CdpClient;
use crate::launcher::ChromeLauncher;
use crate::session::CdpBrowserSession;

/// Opens independent headless Chrome sessions.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    launcher: ChromeLauncher,
}

impl ChromeSessionFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            launcher: ChromeLauncher::new(config),
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let config = self.launcher.config();
        let mut process = self.launcher.launch().await?;

        let client = match CdpClient::connect(process.ws_url(), config.command_timeout()).await {
            Ok(client) => client,
            Err(e) => {
                process.shutdown().await;
                return Err(SessionError::LaunchFailed(e.to_string()));
            }
        };

        let page = match client.open_page().await {
            Ok(page) => page,
            Err(e) => {
                drop(client);
                process.shutdown().await;
                return Err(SessionError::LaunchFailed(e.to_string()));
            }
        };

        info!(
            "Opened browser session (PID {:?}, profile {})",
            process.pid(),
            process.profile_dir().display()
        );

        Ok(Box::new(CdpBrowserSession::new(
            client,
            page,
            process,
            config.page_load_timeout(),
        )))
    }
}
