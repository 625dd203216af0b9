//! Push notification delivery.

use std::time::Duration;

use async_trait::async_trait;
use mylist_config::NotificationConfig;
use mylist_protocols::{NotificationError, Notifier};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Body posted to the notification API.
#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    message: String,
    subscription: &'a Value,
}

/// User-facing summary of a finished job.
pub fn completion_message(failed: &[String]) -> String {
    if failed.is_empty() {
        "すべての動画の登録が完了しました！".to_string()
    } else {
        format!(
            "登録処理が完了しました。{}件の動画で登録に失敗しました。",
            failed.len()
        )
    }
}

/// Sends completion notifications through an HTTP push API.
pub struct WebPushNotifier {
    client: Client,
    endpoint: Option<String>,
    timeout: Duration,
}

impl WebPushNotifier {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            timeout,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.endpoint.clone(), config.timeout())
    }
}

#[async_trait]
impl Notifier for WebPushNotifier {
    async fn notify(&self, subscription: &str, failed: &[String]) -> Result<(), NotificationError> {
        let subscription: Value = serde_json::from_str(subscription)
            .map_err(|e| NotificationError::InvalidSubscription(e.to_string()))?;

        let Some(endpoint) = self.endpoint.as_deref() else {
            info!("Notification endpoint not configured, skipping push notification");
            return Ok(());
        };

        let payload = NotificationPayload {
            message: completion_message(failed),
            subscription: &subscription,
        };

        let response = self
            .client
            .post(endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Push notification sent ({} failed ids)", failed.len());
        Ok(())
    }
}
