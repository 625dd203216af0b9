//! Single-invocation job paths: a tracked chunk of a parallel job, and a
//! whole-list batch run.

use std::sync::Arc;

use mylist_protocols::{
    ChunkMarker, CompletionTracker, Credentials, Notifier, RegistrationError,
    RegistrationOutcome,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ChainError;
use crate::registrar::PlaylistRegistrar;
use crate::retry::RetryCoordinator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedJobReport {
    pub failed_id_list: Vec<String>,
    /// No other chunk of the job was still running when this one finished.
    #[serde(skip)]
    pub job_complete: bool,
}

/// One chunk of a job that was split across invocations by the caller.
///
/// The playlist must already exist. The last chunk to finish sends the
/// notification; it reports only its own failures.
pub struct TrackedJob {
    tracker: Arc<dyn CompletionTracker>,
    registrar: Arc<dyn PlaylistRegistrar>,
    notifier: Arc<dyn Notifier>,
}

impl TrackedJob {
    pub fn new(
        tracker: Arc<dyn CompletionTracker>,
        registrar: Arc<dyn PlaylistRegistrar>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            tracker,
            registrar,
            notifier,
        }
    }

    /// Run the chunk. On error the marker stays in place, so the job is never
    /// reported complete.
    pub async fn run(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
        marker: &ChunkMarker,
        subscription: Option<&str>,
    ) -> Result<TrackedJobReport, ChainError> {
        self.tracker.begin(marker).await?;
        info!(
            "Job {} chunk {}: registering {} identifiers",
            marker.job_id,
            marker.chunk_index,
            identifiers.len()
        );

        let outcome = self
            .registrar
            .register_batch(credentials, identifiers)
            .await?;

        self.tracker.finish(marker).await?;
        let job_complete = self.tracker.is_complete(&marker.job_id).await?;

        if job_complete {
            info!("Job {} complete", marker.job_id);
            if let Some(subscription) = subscription {
                if let Err(e) = self.notifier.notify(subscription, outcome.failed()).await {
                    warn!("Failed to send completion notification: {}", e);
                }
            }
        }

        Ok(TrackedJobReport {
            failed_id_list: outcome.into_failed(),
            job_complete,
        })
    }
}

/// The whole list in one process, one session per attempt.
pub struct BatchRun {
    coordinator: Arc<RetryCoordinator>,
    notifier: Arc<dyn Notifier>,
}

impl BatchRun {
    pub fn new(coordinator: Arc<RetryCoordinator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            coordinator,
            notifier,
        }
    }

    pub async fn run(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
        title: Option<&str>,
        subscription: Option<&str>,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let title = self.coordinator.prepare_playlist(credentials, title).await?;
        info!("Registering {} identifiers into {}", identifiers.len(), title);

        let failed = self.coordinator.register(credentials, identifiers).await?;
        let outcome = RegistrationOutcome::new(identifiers.len(), failed);
        info!(
            "Batch finished: {} registered, {} failed",
            outcome.succeeded(),
            outcome.failed().len()
        );

        if let Some(subscription) = subscription {
            if let Err(e) = self.notifier.notify(subscription, outcome.failed()).await {
                warn!("Failed to send completion notification: {}", e);
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
