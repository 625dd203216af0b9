//! Registration, chain and collaborator configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::default_true;

/// Registration core settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Upper bound of concurrently open browser sessions per dispatch.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Attempts per chunk before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_element_timeout")]
    pub element_timeout_secs: u64,

    #[serde(default = "default_count_timeout")]
    pub count_timeout_secs: u64,

    /// Wall-clock bound of the clear phase.
    #[serde(default = "default_clear_timeout")]
    pub clear_timeout_secs: u64,

    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    #[serde(default = "default_true")]
    pub screenshots_on_failure: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            max_retries: default_max_retries(),
            element_timeout_secs: default_element_timeout(),
            count_timeout_secs: default_count_timeout(),
            clear_timeout_secs: default_clear_timeout(),
            settle_delay_ms: default_settle_delay(),
            screenshots_on_failure: true,
        }
    }
}

impl RegistrationConfig {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn count_timeout(&self) -> Duration {
        Duration::from_secs(self.count_timeout_secs)
    }

    pub fn clear_timeout(&self) -> Duration {
        Duration::from_secs(self.clear_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_max_workers() -> usize {
    3
}

fn default_max_retries() -> u32 {
    3
}

fn default_element_timeout() -> u64 {
    10
}

fn default_count_timeout() -> u64 {
    30
}

fn default_clear_timeout() -> u64 {
    600
}

fn default_settle_delay() -> u64 {
    1000
}

/// Chain continuation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Self-invocation endpoint receiving continuation requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_handoff_timeout")]
    pub handoff_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            endpoint: None,
            handoff_timeout_secs: default_handoff_timeout(),
        }
    }
}

impl ChainConfig {
    pub fn handoff_timeout(&self) -> Duration {
        Duration::from_secs(self.handoff_timeout_secs)
    }
}

fn default_batch_size() -> usize {
    30
}

fn default_handoff_timeout() -> u64 {
    5
}

/// Push notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_notification_timeout(),
        }
    }
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_notification_timeout() -> u64 {
    30
}

/// Boundary credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Name of the environment variable holding the base64 shared key.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
        }
    }
}

fn default_secret_env() -> String {
    "SHARED_SECRET_KEY".to_string()
}

/// Chunk completion marker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_tracking_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_tracking_prefix")]
    pub prefix: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            dir: default_tracking_dir(),
            prefix: default_tracking_prefix(),
        }
    }
}

fn default_tracking_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_tracking_prefix() -> String {
    "register".to_string()
}

/// Failure screenshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotsConfig {
    #[serde(default = "default_screenshots_dir")]
    pub dir: PathBuf,
}

impl Default for ScreenshotsConfig {
    fn default() -> Self {
        Self {
            dir: default_screenshots_dir(),
        }
    }
}

fn default_screenshots_dir() -> PathBuf {
    std::env::temp_dir().join("mylist")
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Directory of the daily-rolling log file. File logging is off when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    /// Log directory, falling back to `~/.mylist/logs`.
    pub fn dir_or_default(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".mylist").join("logs")))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Console log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
