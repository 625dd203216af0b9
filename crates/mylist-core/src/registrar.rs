//! The registration capability consumed by the chain and job paths.

use std::sync::Arc;

use async_trait::async_trait;
use mylist_protocols::{Credentials, RegistrationError, RegistrationOutcome};

use crate::dispatcher::ChunkedDispatcher;
use crate::retry::RetryCoordinator;

/// Playlist setup and batch registration for one account.
#[async_trait]
pub trait PlaylistRegistrar: Send + Sync {
    /// Delete every playlist and create the target one. Returns its title.
    async fn prepare_playlist(
        &self,
        credentials: &Credentials,
        title: Option<&str>,
    ) -> Result<String, RegistrationError>;

    /// Register a batch of identifiers into the playlist.
    async fn register_batch(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<RegistrationOutcome, RegistrationError>;
}

/// [`PlaylistRegistrar`] backed by real browser sessions.
pub struct BrowserRegistrar {
    coordinator: Arc<RetryCoordinator>,
    dispatcher: Arc<ChunkedDispatcher>,
}

impl BrowserRegistrar {
    pub fn new(coordinator: Arc<RetryCoordinator>, dispatcher: Arc<ChunkedDispatcher>) -> Self {
        Self {
            coordinator,
            dispatcher,
        }
    }
}

#[async_trait]
impl PlaylistRegistrar for BrowserRegistrar {
    async fn prepare_playlist(
        &self,
        credentials: &Credentials,
        title: Option<&str>,
    ) -> Result<String, RegistrationError> {
        self.coordinator.prepare_playlist(credentials, title).await
    }

    async fn register_batch(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let report = self.dispatcher.dispatch(credentials, identifiers).await;
        Ok(RegistrationOutcome::new(identifiers.len(), report.failed))
    }
}
