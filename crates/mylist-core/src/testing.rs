//! Hand-written fakes shared by the unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mylist_config::{SelectorsConfig, SiteConfig};
use mylist_protocols::{
    BrowserSession, ChainInvocationError, ChunkMarker, CompletionTracker, ContinuationRequest,
    ContinuationTransport, CredentialCodec, Credentials, DecryptionError, Locator,
    NotificationError, Notifier, RegistrationError, RegistrationOutcome, ScreenshotError,
    ScreenshotSink, SessionError, SessionFactory, TrackerError,
};
use parking_lot::Mutex;

use crate::registrar::PlaylistRegistrar;
use crate::workflow::{PageLocators, RegistrationWorkflow, WorkflowTimeouts};

pub fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn numbered(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("sm{}", i)).collect()
}

pub fn credentials() -> Credentials {
    Credentials::new("user@example.com", "hunter2")
}

pub fn fast_timeouts() -> WorkflowTimeouts {
    WorkflowTimeouts {
        element: Duration::from_millis(50),
        count: Duration::from_millis(50),
        settle: Duration::ZERO,
    }
}

pub fn workflow() -> RegistrationWorkflow {
    RegistrationWorkflow::new(SiteConfig::default(), fast_timeouts())
}

/// Scripted behavior of one fake session.
#[derive(Debug, Clone, Default)]
pub struct SessionPlan {
    /// Playlists present before clearing.
    pub playlists: usize,
    /// Identifiers whose watch page never shows the menu.
    pub failing: HashSet<String>,
    /// The login form never goes away.
    pub login_rejected: bool,
    /// The browser dies on this identifier's watch page.
    pub die_on: Option<String>,
    /// Opening the session fails.
    pub fail_open: bool,
    /// Delay added to every navigation.
    pub hold: Duration,
    /// Elements that never appear.
    pub missing: Vec<Locator>,
}

impl SessionPlan {
    pub fn failing(ids: &[String]) -> Self {
        Self {
            failing: ids.iter().cloned().collect(),
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct FactoryStats {
    pub opened: AtomicUsize,
    pub open_now: AtomicUsize,
    pub max_open: AtomicUsize,
    pub closed: AtomicUsize,
}

struct SessionState {
    url: String,
    playlists: usize,
    login_form: bool,
    alive: bool,
    closed: bool,
}

pub struct FakeSession {
    plan: SessionPlan,
    locators: PageLocators,
    state: Mutex<SessionState>,
    calls: Arc<Mutex<Vec<String>>>,
    stats: Arc<FactoryStats>,
}

impl FakeSession {
    pub fn new(plan: SessionPlan) -> Self {
        let stats = FactoryStats::default();
        stats.opened.store(1, Ordering::SeqCst);
        stats.open_now.store(1, Ordering::SeqCst);
        Self::with_stats(plan, Arc::new(stats), Arc::default())
    }

    pub fn closes(&self) -> usize {
        self.stats.closed.load(Ordering::SeqCst)
    }

    fn with_stats(
        plan: SessionPlan,
        stats: Arc<FactoryStats>,
        calls: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        let state = SessionState {
            url: String::new(),
            playlists: plan.playlists,
            login_form: true,
            alive: true,
            closed: false,
        };
        Self {
            plan,
            locators: PageLocators::from(&SelectorsConfig::default()),
            state: Mutex::new(state),
            calls,
            stats,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn playlists(&self) -> usize {
        self.state.lock().playlists
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn current_id(&self) -> Option<String> {
        let state = self.state.lock();
        state
            .url
            .rsplit_once("/watch/")
            .map(|(_, id)| id.to_string())
    }

    fn check_alive(&self) -> Result<(), SessionError> {
        if self.state.lock().alive {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }

    fn check_present(&self, locator: &Locator) -> Result<(), SessionError> {
        if self.plan.missing.contains(locator) {
            return Err(SessionError::ElementNotFound(locator.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.check_alive()?;
        if !self.plan.hold.is_zero() {
            tokio::time::sleep(self.plan.hold).await;
        }
        self.record(format!("navigate {}", url));
        self.state.lock().url = url.to_string();
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, _timeout: Duration) -> Result<(), SessionError> {
        self.check_alive()?;
        self.check_present(locator)?;
        self.record(format!("wait {}", locator));
        Ok(())
    }

    async fn click(&self, locator: &Locator, _timeout: Duration) -> Result<(), SessionError> {
        self.check_alive()?;
        self.check_present(locator)?;
        if let Some(id) = self.current_id() {
            if self.plan.die_on.as_deref() == Some(id.as_str()) {
                self.state.lock().alive = false;
                return Err(SessionError::Timeout(format!("waiting for {}", locator)));
            }
            if self.plan.failing.contains(&id) {
                return Err(SessionError::ElementNotFound(locator.to_string()));
            }
        }
        self.record(format!("click {}", locator));
        if *locator == self.locators.login_submit && !self.plan.login_rejected {
            self.state.lock().login_form = false;
        }
        Ok(())
    }

    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        _timeout: Duration,
    ) -> Result<(), SessionError> {
        self.check_alive()?;
        self.check_present(locator)?;
        if *locator == self.locators.password_input {
            self.record(format!("type {} ***", locator));
        } else {
            self.record(format!("type {} {}", locator, text));
        }
        Ok(())
    }

    async fn read_text(
        &self,
        locator: &Locator,
        _timeout: Duration,
    ) -> Result<String, SessionError> {
        self.check_alive()?;
        self.check_present(locator)?;
        if *locator == self.locators.playlist_count {
            return Ok(self.state.lock().playlists.to_string());
        }
        Err(SessionError::ElementNotFound(locator.to_string()))
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool, SessionError> {
        self.check_alive()?;
        if *locator == self.locators.login_submit {
            return Ok(self.state.lock().login_form);
        }
        Ok(true)
    }

    async fn accept_dialog(&self, _timeout: Duration) -> Result<(), SessionError> {
        self.check_alive()?;
        self.record("accept dialog".to_string());
        let mut state = self.state.lock();
        state.playlists = state.playlists.saturating_sub(1);
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        self.check_alive()?;
        Ok(b"\x89PNG".to_vec())
    }

    async fn is_alive(&self) -> bool {
        self.state.lock().alive
    }

    async fn close(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            self.stats.open_now.fetch_sub(1, Ordering::SeqCst);
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

type PlanFn = dyn Fn(usize) -> SessionPlan + Send + Sync;

/// Opens [`FakeSession`]s following a plan chosen by open index.
pub struct FakeFactory {
    plan: Box<PlanFn>,
    pub stats: Arc<FactoryStats>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFactory {
    pub fn new(plan: impl Fn(usize) -> SessionPlan + Send + Sync + 'static) -> Self {
        Self {
            plan: Box::new(plan),
            stats: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn healthy() -> Self {
        Self::new(|_| SessionPlan::default())
    }

    pub fn opened(&self) -> usize {
        self.stats.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.stats.closed.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.stats.max_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let index = self.stats.opened.fetch_add(1, Ordering::SeqCst);
        let plan = (self.plan)(index);
        if plan.fail_open {
            return Err(SessionError::LaunchFailed("scripted".to_string()));
        }
        let now = self.stats.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_open.fetch_max(now, Ordering::SeqCst);
        Ok(Box::new(FakeSession::with_stats(
            plan,
            self.stats.clone(),
            self.calls.clone(),
        )))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub stored: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl ScreenshotSink for RecordingSink {
    async fn store(&self, png: &[u8]) -> Result<String, ScreenshotError> {
        let mut stored = self.stored.lock();
        stored.push(png.to_vec());
        Ok(format!("shot-{}.png", stored.len()))
    }
}

/// Accepts `enc:<plaintext>` payloads.
pub struct FakeCodec;

impl CredentialCodec for FakeCodec {
    fn decrypt(&self, encrypted: &str) -> Result<String, DecryptionError> {
        encrypted
            .strip_prefix("enc:")
            .map(str::to_string)
            .ok_or(DecryptionError::AuthenticationFailed)
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub requests: Mutex<VecDeque<ContinuationRequest>>,
    pub sent: AtomicUsize,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn pop(&self) -> Option<ContinuationRequest> {
        self.requests.lock().pop_front()
    }
}

#[async_trait]
impl ContinuationTransport for RecordingTransport {
    async fn hand_off(&self, request: &ContinuationRequest) -> Result<(), ChainInvocationError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ChainInvocationError::NotConfigured);
        }
        self.requests.lock().push_back(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, Vec<String>)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subscription: &str, failed: &[String]) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .push((subscription.to_string(), failed.to_vec()));
        if self.fail {
            return Err(NotificationError::Request("scripted".to_string()));
        }
        Ok(())
    }
}

/// Registrar that fails a fixed set of identifiers.
#[derive(Default)]
pub struct FakeRegistrar {
    pub failing: HashSet<String>,
    pub prepared: Mutex<Vec<(String, Option<String>)>>,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub fail_prepare: bool,
}

impl FakeRegistrar {
    pub fn failing(ids: &[String]) -> Self {
        Self {
            failing: ids.iter().cloned().collect(),
            ..Self::default()
        }
    }

    pub fn prepare_calls(&self) -> usize {
        self.prepared.lock().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }
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
            .push((credentials.password.clone(), title.map(str::to_string)));
        if self.fail_prepare {
            return Err(RegistrationError::Auth("scripted".to_string()));
        }
        Ok(title.unwrap_or("MyList_test").to_string())
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
pub struct MemoryTracker {
    pub in_flight: Mutex<HashSet<(String, String)>>,
    pub begun: AtomicUsize,
}

#[async_trait]
impl CompletionTracker for MemoryTracker {
    async fn begin(&self, marker: &ChunkMarker) -> Result<(), TrackerError> {
        self.begun.fetch_add(1, Ordering::SeqCst);
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
