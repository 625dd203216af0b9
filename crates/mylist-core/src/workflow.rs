//! Browser-level registration steps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mylist_config::{RegistrationConfig, SelectorsConfig, SiteConfig};
use mylist_protocols::{
    resolve_title, BrowserSession, Credentials, Locator, RegistrationError, ScreenshotSink,
    SessionError,
};
use tracing::{debug, info, warn};

const LOGIN_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Parsed element locators of the site.
#[derive(Debug, Clone)]
pub struct PageLocators {
    pub login_link: Locator,
    pub email_input: Locator,
    pub password_input: Locator,
    pub login_submit: Locator,
    pub playlist_count: Locator,
    pub playlist_open: Locator,
    pub playlist_actions: Locator,
    pub playlist_delete: Locator,
    pub create_button: Locator,
    pub title_input: Locator,
    pub create_confirm: Locator,
    pub video_menu: Locator,
    pub add_to_playlist: Locator,
    pub playlist_choice: Locator,
}

impl From<&SelectorsConfig> for PageLocators {
    fn from(s: &SelectorsConfig) -> Self {
        Self {
            login_link: Locator::parse(&s.login_link),
            email_input: Locator::parse(&s.email_input),
            password_input: Locator::parse(&s.password_input),
            login_submit: Locator::parse(&s.login_submit),
            playlist_count: Locator::parse(&s.playlist_count),
            playlist_open: Locator::parse(&s.playlist_open),
            playlist_actions: Locator::parse(&s.playlist_actions),
            playlist_delete: Locator::parse(&s.playlist_delete),
            create_button: Locator::parse(&s.create_button),
            title_input: Locator::parse(&s.title_input),
            create_confirm: Locator::parse(&s.create_confirm),
            video_menu: Locator::parse(&s.video_menu),
            add_to_playlist: Locator::parse(&s.add_to_playlist),
            playlist_choice: Locator::parse(&s.playlist_choice),
        }
    }
}

/// Per-step waits.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowTimeouts {
    pub element: Duration,
    pub count: Duration,
    pub settle: Duration,
}

impl From<&RegistrationConfig> for WorkflowTimeouts {
    fn from(config: &RegistrationConfig) -> Self {
        Self {
            element: config.element_timeout(),
            count: config.count_timeout(),
            settle: config.settle_delay(),
        }
    }
}

/// The site-specific UI steps, executed against a session owned by the
/// caller. Stateless apart from configuration.
pub struct RegistrationWorkflow {
    site: SiteConfig,
    locators: PageLocators,
    timeouts: WorkflowTimeouts,
    screenshots: Option<Arc<dyn ScreenshotSink>>,
}

impl RegistrationWorkflow {
    pub fn new(site: SiteConfig, timeouts: WorkflowTimeouts) -> Self {
        let locators = PageLocators::from(&site.selectors);
        Self {
            site,
            locators,
            timeouts,
            screenshots: None,
        }
    }

    /// Store a screenshot for every identifier that fails.
    pub fn with_screenshots(mut self, sink: Arc<dyn ScreenshotSink>) -> Self {
        self.screenshots = Some(sink);
        self
    }

    /// Log in and wait until the login form is gone.
    pub async fn authenticate(
        &self,
        session: &dyn BrowserSession,
        credentials: &Credentials,
    ) -> Result<(), RegistrationError> {
        let l = &self.locators;
        let t = self.timeouts.element;

        session
            .navigate(&self.site.base_url)
            .await
            .map_err(auth_error)?;
        session.click(&l.login_link, t).await.map_err(auth_error)?;
        session
            .type_text(&l.email_input, &credentials.email, t)
            .await
            .map_err(auth_error)?;
        session
            .type_text(&l.password_input, &credentials.password, t)
            .await
            .map_err(auth_error)?;
        session.click(&l.login_submit, t).await.map_err(auth_error)?;

        let start = Instant::now();
        loop {
            match session.is_present(&l.login_submit).await {
                Ok(false) => break,
                Ok(true) => {}
                Err(e) if e.is_fatal() => return Err(auth_error(e)),
                Err(e) => debug!("Login form probe failed: {}", e),
            }
            if start.elapsed() > t {
                return Err(RegistrationError::Auth(
                    "login form still shown after submit".to_string(),
                ));
            }
            tokio::time::sleep(LOGIN_POLL_INTERVAL).await;
        }

        info!("Logged in as {}", credentials.email);
        Ok(())
    }

    /// Delete every playlist of the account. Returns how many were deleted.
    ///
    /// Unbounded: callers put a wall-clock timeout around it.
    pub async fn clear_playlists(
        &self,
        session: &dyn BrowserSession,
    ) -> Result<usize, RegistrationError> {
        let l = &self.locators;
        let t = self.timeouts.element;
        let step = |e| RegistrationError::during("clear", e);

        session
            .navigate(&self.site.playlist_url)
            .await
            .map_err(step)?;

        let mut deleted = 0;
        loop {
            let count = session
                .read_text(&l.playlist_count, self.timeouts.count)
                .await
                .map_err(step)?;
            if count.trim() == "0" {
                break;
            }
            debug!("{} playlists left", count.trim());

            session.click(&l.playlist_open, t).await.map_err(step)?;
            session.click(&l.playlist_actions, t).await.map_err(step)?;
            session.click(&l.playlist_delete, t).await.map_err(step)?;
            session.accept_dialog(t).await.map_err(step)?;
            tokio::time::sleep(self.timeouts.settle).await;
            deleted += 1;

            session
                .navigate(&self.site.playlist_url)
                .await
                .map_err(step)?;
        }

        info!("Deleted {} playlists", deleted);
        Ok(deleted)
    }

    /// Create the target playlist and return its resolved title.
    pub async fn create_playlist(
        &self,
        session: &dyn BrowserSession,
        title: Option<&str>,
    ) -> Result<String, RegistrationError> {
        let l = &self.locators;
        let t = self.timeouts.element;
        let step = |e| RegistrationError::during("create", e);

        session.click(&l.create_button, t).await.map_err(step)?;
        let title = resolve_title(title);
        session
            .type_text(&l.title_input, &title, t)
            .await
            .map_err(step)?;
        session.click(&l.create_confirm, t).await.map_err(step)?;
        tokio::time::sleep(self.timeouts.settle).await;

        info!("Created playlist {}", title);
        Ok(title)
    }

    /// Add every identifier to the playlist, in order. Returns the ones that
    /// failed. A failure is data unless the session itself died.
    pub async fn add_identifiers(
        &self,
        session: &dyn BrowserSession,
        identifiers: &[String],
    ) -> Result<Vec<String>, RegistrationError> {
        let mut failed = Vec::new();

        for id in identifiers {
            match self.add_one(session, id).await {
                Ok(()) => debug!("Registered {}", id),
                Err(e) => {
                    warn!("Failed to register {}: {}", id, e);
                    if !session.is_alive().await {
                        return Err(RegistrationError::SessionDeath(format!(
                            "browser stopped responding while adding {}: {}",
                            id, e
                        )));
                    }
                    self.capture(session).await;
                    failed.push(id.clone());
                }
            }
        }

        Ok(failed)
    }

    async fn add_one(&self, session: &dyn BrowserSession, id: &str) -> Result<(), SessionError> {
        let l = &self.locators;
        let t = self.timeouts.element;

        session.navigate(&self.site.watch_url(id)).await?;
        session.click(&l.video_menu, t).await?;
        session.click(&l.add_to_playlist, t).await?;
        session.click(&l.playlist_choice, t).await?;
        tokio::time::sleep(self.timeouts.settle).await;
        Ok(())
    }

    async fn capture(&self, session: &dyn BrowserSession) {
        let Some(sink) = &self.screenshots else {
            return;
        };
        match session.screenshot().await {
            Ok(png) => {
                if let Err(e) = sink.store(&png).await {
                    warn!("Failed to store screenshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to capture screenshot: {}", e),
        }
    }
}

fn auth_error(e: SessionError) -> RegistrationError {
    if e.is_fatal() {
        RegistrationError::SessionDeath(e.to_string())
    } else {
        RegistrationError::Auth(e.to_string())
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
