//! Wiring of the registration services from configuration.

use std::sync::Arc;

use mylist_browser::ChromeSessionFactory;
use mylist_config::Config;
use mylist_core::{
    BatchRun, BrowserRegistrar, ChainContinuation, ChunkedDispatcher, PlaylistRegistrar,
    RegistrationWorkflow, RetryCoordinator, TrackedJob, WorkflowTimeouts,
};
use mylist_protocols::{CompletionTracker, ContinuationTransport, Notifier, SessionFactory};
use mylist_services::{
    AesGcmCredentialCodec, FileCompletionTracker, FileScreenshotSink, HttpContinuationTransport,
    WebPushNotifier,
};

/// Every long-lived service of one process.
pub(crate) struct Services {
    pub coordinator: Arc<RetryCoordinator>,
    pub dispatcher: Arc<ChunkedDispatcher>,
    pub codec: Arc<AesGcmCredentialCodec>,
    pub notifier: Arc<dyn Notifier>,
    pub transport: Arc<dyn ContinuationTransport>,
    pub tracker: Arc<dyn CompletionTracker>,
    batch_size: usize,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        let factory: Arc<dyn SessionFactory> =
            Arc::new(ChromeSessionFactory::new(config.browser.clone()));
        Self::with_factory(config, factory)
    }

    pub fn with_factory(config: &Config, factory: Arc<dyn SessionFactory>) -> Self {
        let registration = &config.registration;

        let mut workflow = RegistrationWorkflow::new(
            config.site.clone(),
            WorkflowTimeouts::from(registration),
        );
        if registration.screenshots_on_failure {
            let sink = FileScreenshotSink::from_config(&config.screenshots);
            workflow = workflow.with_screenshots(Arc::new(sink));
        }

        let coordinator = Arc::new(RetryCoordinator::new(
            factory,
            Arc::new(workflow),
            registration.max_retries,
            registration.clear_timeout(),
        ));
        let dispatcher = Arc::new(ChunkedDispatcher::new(
            coordinator.clone(),
            registration.max_workers,
        ));

        Self {
            coordinator,
            dispatcher,
            codec: Arc::new(AesGcmCredentialCodec::from_config(&config.credentials)),
            notifier: Arc::new(WebPushNotifier::from_config(&config.notification)),
            transport: Arc::new(HttpContinuationTransport::from_config(&config.chain)),
            tracker: Arc::new(FileCompletionTracker::from_config(&config.tracking)),
            batch_size: config.chain.batch_size,
        }
    }

    pub fn registrar(&self) -> Arc<dyn PlaylistRegistrar> {
        Arc::new(BrowserRegistrar::new(
            self.coordinator.clone(),
            self.dispatcher.clone(),
        ))
    }

    pub fn chain(&self) -> Arc<ChainContinuation> {
        Arc::new(ChainContinuation::new(
            self.batch_size,
            self.registrar(),
            self.transport.clone(),
            self.notifier.clone(),
            self.codec.clone(),
        ))
    }

    pub fn tracked_job(&self) -> Arc<TrackedJob> {
        Arc::new(TrackedJob::new(
            self.tracker.clone(),
            self.registrar(),
            self.notifier.clone(),
        ))
    }

    pub fn batch_run(&self) -> BatchRun {
        BatchRun::new(self.coordinator.clone(), self.notifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mylist_config::CredentialsConfig;
    use mylist_protocols::{CredentialCodec, DecryptionError};

    fn config() -> Config {
        Config {
            credentials: CredentialsConfig {
                secret_env: "MYLIST_TEST_UNSET_SECRET_7".to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_services_wire_from_default_config() {
        let services = Services::from_config(&config());
        assert_eq!(services.dispatcher.max_workers(), 3);
        assert_eq!(services.coordinator.max_retries(), 3);
        assert_eq!(services.chain().batch_size(), 30);
    }

    #[test]
    fn test_missing_secret_surfaces_on_decrypt() {
        let services = Services::from_config(&config());
        assert_eq!(
            services.codec.decrypt("payload").unwrap_err(),
            DecryptionError::MissingKey("MYLIST_TEST_UNSET_SECRET_7".to_string())
        );
    }
}
