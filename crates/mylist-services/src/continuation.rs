//! Chain hand-off over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use mylist_config::ChainConfig;
use mylist_protocols::{ChainInvocationError, ContinuationRequest, ContinuationTransport};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Posts continuation requests to the service's own invoke endpoint.
///
/// The next step runs for much longer than the hand-off timeout, so a timeout
/// after the request was sent counts as delivered. Connecting is bounded by
/// `timeout` and the whole request by twice that; failing to connect is an
/// error.
pub struct HttpContinuationTransport {
    client: Client,
    endpoint: Option<String>,
    timeout: Duration,
}

impl HttpContinuationTransport {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(config.endpoint.clone(), config.handoff_timeout())
    }
}

#[async_trait]
impl ContinuationTransport for HttpContinuationTransport {
    async fn hand_off(&self, request: &ContinuationRequest) -> Result<(), ChainInvocationError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ChainInvocationError::NotConfigured)?;

        let body = serde_json::to_vec(request)
            .map_err(|e| ChainInvocationError::Serialization(e.to_string()))?;

        let result = self
            .client
            .post(endpoint)
            .timeout(self.timeout * 2)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Continuation accepted with {}", response.status());
                Ok(())
            }
            Ok(response) => Err(ChainInvocationError::Request(format!(
                "HTTP {}",
                response.status()
            ))),
            Err(e) if e.is_timeout() && !e.is_connect() => {
                info!("Continuation dispatched (no response within {:?})", self.timeout * 2);
                Ok(())
            }
            Err(e) => Err(ChainInvocationError::Request(e.to_string())),
        }
    }
}
