//! Fakes for invocation and router tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use mylist_core::{ChainContinuation, PlaylistRegistrar, TrackedJob};
use mylist_protocols::{
    ChainInvocationError, ChunkMarker, CompletionTracker, ContinuationRequest,
    ContinuationTransport, Credentials, NotificationError, Notifier, RegistrationError,
    RegistrationOutcome, TrackerError,
};
use mylist_services::AesGcmCredentialCodec;
use parking_lot::Mutex;

use crate::state::AppState;

pub const KEY: [u8; 32] = [7u8; 32];

#[derive(Default)]
pub struct FakeRegistrar {
    pub failing: HashSet<String>,
    pub fail_prepare: bool,
    pub prepared: Mutex<Vec<(Credentials, Option<String>)>>,
    pub batches: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl PlaylistRegistrar for FakeRegistrar {
    async fn prepare_playlist(
        &self,
        credentials: &Credentials,
        title: Option<&str>,
    ) -> Result<String, RegistrationError> {
        self.prepared
            .lock()
            .push((credentials.clone(), title.map(str::to_string)));
        if self.fail_prepare {
            return Err(RegistrationError::Auth("login form still shown".to_string()));
        }
        Ok(title.unwrap_or("MyList_20260101_000000").to_string())
    }

    async fn register_batch(
        &self,
        _credentials: &Credentials,
        identifiers: &[String],
    ) -> Result<RegistrationOutcome, RegistrationError> {
        self.batches.lock().push(identifiers.to_vec());
        let failed = identifiers
            .iter()
            .filter(|id| self.failing.contains(*id))
            .cloned()
            .collect();
        Ok(RegistrationOutcome::new(identifiers.len(), failed))
    }
}

#[derive(Default)]
pub struct QueueTransport {
    pub requests: Mutex<VecDeque<ContinuationRequest>>,
}

#[async_trait]
impl ContinuationTransport for QueueTransport {
    async fn hand_off(&self, request: &ContinuationRequest) -> Result<(), ChainInvocationError> {
        self.requests.lock().push_back(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subscription: &str, failed: &[String]) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .push((subscription.to_string(), failed.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTracker {
    pub in_flight: Mutex<HashSet<(String, String)>>,
}

#[async_trait]
impl CompletionTracker for MemoryTracker {
    async fn begin(&self, marker: &ChunkMarker) -> Result<(), TrackerError> {
        self.in_flight
            .lock()
            .insert((marker.job_id.clone(), marker.chunk_index.clone()));
        Ok(())
    }

    async fn finish(&self, marker: &ChunkMarker) -> Result<(), TrackerError> {
        self.in_flight
            .lock()
            .remove(&(marker.job_id.clone(), marker.chunk_index.clone()));
        Ok(())
    }

    async fn is_complete(&self, job_id: &str) -> Result<bool, TrackerError> {
        Ok(!self.in_flight.lock().iter().any(|(job, _)| job == job_id))
    }
}

/// Every collaborator of an [`AppState`], kept for inspection.
pub struct TestServices {
    pub registrar: Arc<FakeRegistrar>,
    pub transport: Arc<QueueTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub tracker: Arc<MemoryTracker>,
    pub codec: Arc<AesGcmCredentialCodec>,
}

impl TestServices {
    pub fn new() -> Self {
        Self::with_registrar(FakeRegistrar::default())
    }

    pub fn with_registrar(registrar: FakeRegistrar) -> Self {
        Self {
            registrar: Arc::new(registrar),
            transport: Arc::default(),
            notifier: Arc::default(),
            tracker: Arc::default(),
            codec: Arc::new(AesGcmCredentialCodec::from_key(&KEY).unwrap()),
        }
    }

    pub fn encrypt(&self, password: &str) -> String {
        self.codec.encrypt(password).unwrap()
    }

    pub fn state(&self) -> Arc<AppState> {
        let chain = ChainContinuation::new(
            30,
            self.registrar.clone(),
            self.transport.clone(),
            self.notifier.clone(),
            self.codec.clone(),
        );
        let tracked = TrackedJob::new(
            self.tracker.clone(),
            self.registrar.clone(),
            self.notifier.clone(),
        );
        Arc::new(AppState::new(
            Arc::new(chain),
            self.registrar.clone(),
            Arc::new(tracked),
            self.codec.clone(),
        ))
    }
}

pub fn numbered(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("sm{}", i)).collect()
}
