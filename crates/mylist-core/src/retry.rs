//! Session-owning retry around the registration workflow.

use std::sync::Arc;
use std::time::Duration;

use mylist_protocols::{BrowserSession, Credentials, RegistrationError, SessionFactory};
use tracing::{debug, info, warn};

use crate::workflow::RegistrationWorkflow;

/// Runs workflow steps on fresh sessions and retries whole lists.
///
/// Every attempt opens its own session and closes it on every exit path, so
/// no browser outlives the call that opened it.
pub struct RetryCoordinator {
    factory: Arc<dyn SessionFactory>,
    workflow: Arc<RegistrationWorkflow>,
    max_retries: u32,
    clear_timeout: Duration,
}

impl RetryCoordinator {
    pub fn new(
        factory: Arc<dyn SessionFactory>,
        workflow: Arc<RegistrationWorkflow>,
        max_retries: u32,
        clear_timeout: Duration,
    ) -> Self {
        Self {
            factory,
            workflow,
            max_retries,
            clear_timeout,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Register `identifiers` and return the ones that failed.
    ///
    /// A list where nothing succeeded is retried on a new session, up to
    /// `max_retries` attempts. The first attempt with any success wins.
    pub async fn register(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<Vec<String>, RegistrationError> {
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let attempts = self.max_retries();
        let mut attempt = 1;
        loop {
            let last = attempt >= attempts;
            match self.attempt(credentials, identifiers).await {
                Ok(failed) if failed.len() < identifiers.len() || last => {
                    info!(
                        "Attempt {}: {} of {} registered",
                        attempt,
                        identifiers.len() - failed.len(),
                        identifiers.len()
                    );
                    return Ok(failed);
                }
                Ok(_) => warn!("Attempt {}/{}: every identifier failed", attempt, attempts),
                Err(e) if last => return Err(e),
                Err(e) => warn!("Attempt {}/{} failed: {}", attempt, attempts, e),
            }
            attempt += 1;
        }
    }

    async fn attempt(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<Vec<String>, RegistrationError> {
        let session = self.factory.open().await?;
        let result = self
            .login_and_add(session.as_ref(), credentials, identifiers)
            .await;
        close_quietly(session.as_ref()).await;
        result
    }

    async fn login_and_add(
        &self,
        session: &dyn BrowserSession,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<Vec<String>, RegistrationError> {
        self.workflow.authenticate(session, credentials).await?;
        self.workflow.add_identifiers(session, identifiers).await
    }

    /// Log in, delete every playlist and create the target one. Returns the
    /// resolved title.
    pub async fn prepare_playlist(
        &self,
        credentials: &Credentials,
        title: Option<&str>,
    ) -> Result<String, RegistrationError> {
        let session = self.factory.open().await?;
        let result = self
            .login_clear_create(session.as_ref(), credentials, title)
            .await;
        close_quietly(session.as_ref()).await;
        result
    }

    async fn login_clear_create(
        &self,
        session: &dyn BrowserSession,
        credentials: &Credentials,
        title: Option<&str>,
    ) -> Result<String, RegistrationError> {
        self.workflow.authenticate(session, credentials).await?;

        let clear = self.workflow.clear_playlists(session);
        let deleted = tokio::time::timeout(self.clear_timeout, clear)
            .await
            .map_err(|_| {
                RegistrationError::Timeout(format!(
                    "clearing playlists took longer than {:?}",
                    self.clear_timeout
                ))
            })??;
        debug!("Cleared {} playlists before creating", deleted);

        self.workflow.create_playlist(session, title).await
    }
}

async fn close_quietly(session: &dyn BrowserSession) {
    if let Err(e) = session.close().await {
        debug!("Failed to close browser session: {}", e);
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
