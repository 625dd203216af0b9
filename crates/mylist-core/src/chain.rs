//! Chain continuation: a long list registered as a sequence of short,
//! independently invoked batch steps.

use std::sync::Arc;

use mylist_protocols::{
    ContinuationRequest, ContinuationTransport, CredentialCodec, Credentials, Notifier,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ChainError;
use crate::registrar::PlaylistRegistrar;

/// Progress of one batch step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainProgress {
    pub processed_count: usize,
    pub remaining_count: usize,
    pub failed_count: usize,
    pub is_complete: bool,
    #[serde(skip)]
    pub title: String,
}

/// What one chain invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainStepReport {
    /// First request: setup was handed off, nothing registered yet.
    Started { total_videos: usize },
    /// A setup or batch step ran.
    Progress(ChainProgress),
}

pub struct ChainContinuation {
    batch_size: usize,
    registrar: Arc<dyn PlaylistRegistrar>,
    transport: Arc<dyn ContinuationTransport>,
    notifier: Arc<dyn Notifier>,
    codec: Arc<dyn CredentialCodec>,
}

impl ChainContinuation {
    pub fn new(
        batch_size: usize,
        registrar: Arc<dyn PlaylistRegistrar>,
        transport: Arc<dyn ContinuationTransport>,
        notifier: Arc<dyn Notifier>,
        codec: Arc<dyn CredentialCodec>,
    ) -> Self {
        Self {
            batch_size: batch_size.max(1),
            registrar,
            transport,
            notifier,
            codec,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run one step of the chain.
    ///
    /// The password is decrypted first on every step, so a bad payload is
    /// rejected before anything is handed off. Hand-off and notification
    /// failures are logged and never fail the step.
    pub async fn step(&self, request: ContinuationRequest) -> Result<ChainStepReport, ChainError> {
        let password = self.codec.decrypt(&request.encrypted_password)?;

        if request.is_first_request {
            let total_videos = request.id_list.len();
            self.hand_off(&request.setup_step()).await;
            info!("Chain started for {} identifiers", total_videos);
            return Ok(ChainStepReport::Started { total_videos });
        }

        let credentials = Credentials::new(request.email.clone(), password);

        let (title, mut remaining, mut failed) = if request.is_delete_and_create_request {
            let title = self
                .registrar
                .prepare_playlist(&credentials, Some(request.title.as_str()))
                .await?;
            (title, request.id_list.clone(), Vec::new())
        } else {
            (
                request.title.clone(),
                request.remaining_ids.clone().unwrap_or_default(),
                request.failed_ids.clone(),
            )
        };

        let rest = remaining.split_off(remaining.len().min(self.batch_size));
        let batch = remaining;
        if !batch.is_empty() {
            let outcome = self.registrar.register_batch(&credentials, &batch).await?;
            failed.extend(outcome.into_failed());
        }

        let progress = ChainProgress {
            processed_count: batch.len(),
            remaining_count: rest.len(),
            failed_count: failed.len(),
            is_complete: rest.is_empty(),
            title: title.clone(),
        };
        info!(
            "Chain step: processed {}, remaining {}, failed {}",
            progress.processed_count, progress.remaining_count, progress.failed_count
        );

        if rest.is_empty() {
            if let Some(subscription) = request.subscription.as_deref() {
                if let Err(e) = self.notifier.notify(subscription, &failed).await {
                    warn!("Failed to send completion notification: {}", e);
                }
            }
        } else {
            self.hand_off(&request.batch_step(&title, rest, failed)).await;
        }

        Ok(ChainStepReport::Progress(progress))
    }

    async fn hand_off(&self, next: &ContinuationRequest) {
        if let Err(e) = self.transport.hand_off(next).await {
            // TODO: persist the request so a stalled chain can be resumed.
            warn!("Failed to hand off chain step: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
