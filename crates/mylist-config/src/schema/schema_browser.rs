//! Browser launch configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::default_true;

/// Headless Chrome settings shared by every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome executable. Looked up in well-known locations when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Parent directory of the per-session profile directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_root: Option<PathBuf>,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub disable_images: bool,

    /// Extra command line switches passed to Chrome.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            profile_root: None,
            launch_timeout_secs: default_launch_timeout(),
            page_load_timeout_secs: default_page_load_timeout(),
            command_timeout_secs: default_command_timeout(),
            disable_images: true,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Profile root, defaulting to the system temp directory.
    pub fn profile_root(&self) -> PathBuf {
        self.profile_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_window_width() -> u32 {
    1366
}

fn default_window_height() -> u32 {
    768
}

fn default_launch_timeout() -> u64 {
    30
}

fn default_page_load_timeout() -> u64 {
    120
}

fn default_command_timeout() -> u64 {
    30
}
