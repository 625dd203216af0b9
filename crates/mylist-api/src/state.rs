//! Application state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mylist_core::{ChainContinuation, PlaylistRegistrar, TrackedJob};
use mylist_protocols::CredentialCodec;

/// Services shared by every invocation.
pub struct AppState {
    pub chain: Arc<ChainContinuation>,
    pub registrar: Arc<dyn PlaylistRegistrar>,
    pub tracked: Arc<TrackedJob>,
    pub codec: Arc<dyn CredentialCodec>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(
        chain: Arc<ChainContinuation>,
        registrar: Arc<dyn PlaylistRegistrar>,
        tracked: Arc<TrackedJob>,
        codec: Arc<dyn CredentialCodec>,
    ) -> Self {
        Self {
            chain,
            registrar,
            tracked,
            codec,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
