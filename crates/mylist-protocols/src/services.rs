//! Collaborator protocol definitions.
//!
//! Small capabilities the registration core consumes through `Arc<dyn _>`
//! handles instead of global service singletons.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::ContinuationRequest;
use crate::error::{
    ChainInvocationError, DecryptionError, NotificationError, ScreenshotError, TrackerError,
};

/// Decrypts the password payload received at the system boundary.
pub trait CredentialCodec: Send + Sync {
    /// Decrypt an encrypted password into plaintext.
    fn decrypt(&self, encrypted: &str) -> Result<String, DecryptionError>;
}

/// Delivers the completion notification for a job.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notify the subscriber about the final failure list.
    async fn notify(&self, subscription: &str, failed: &[String]) -> Result<(), NotificationError>;
}

/// Hands a continuation request to the next, independent invocation.
///
/// Implementations are fire-and-forget: they must not wait for the next
/// step to finish.
#[async_trait]
pub trait ContinuationTransport: Send + Sync {
    /// Deliver the continuation request.
    async fn hand_off(&self, request: &ContinuationRequest) -> Result<(), ChainInvocationError>;
}

/// Marker identifying one in-flight chunk of a parallel job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMarker {
    pub job_id: String,
    pub chunk_index: String,
}

impl ChunkMarker {
    pub fn new(job_id: impl Into<String>, chunk_index: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            chunk_index: chunk_index.into(),
        }
    }
}

/// Tracks completion of the parallel chunks of one job.
#[async_trait]
pub trait CompletionTracker: Send + Sync {
    /// Record that a chunk started processing.
    async fn begin(&self, marker: &ChunkMarker) -> Result<(), TrackerError>;

    /// Record that a chunk finished processing.
    async fn finish(&self, marker: &ChunkMarker) -> Result<(), TrackerError>;

    /// `true` when no chunk of the job is still in flight.
    async fn is_complete(&self, job_id: &str) -> Result<bool, TrackerError>;
}

/// Stores diagnostic screenshots.
#[async_trait]
pub trait ScreenshotSink: Send + Sync {
    /// Store PNG bytes and return where they ended up.
    async fn store(&self, png: &[u8]) -> Result<String, ScreenshotError>;
}
