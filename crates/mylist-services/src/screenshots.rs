//! Failure screenshots on the local filesystem.

use std::path::PathBuf;

use async_trait::async_trait;
use mylist_config::ScreenshotsConfig;
use mylist_protocols::{ScreenshotError, ScreenshotSink};
use tracing::info;

/// Writes PNGs to `<dir>/screenshots/<uuid>.png`.
#[derive(Debug, Clone)]
pub struct FileScreenshotSink {
    dir: PathBuf,
}

impl FileScreenshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ScreenshotsConfig) -> Self {
        Self::new(config.dir.clone())
    }
}

#[async_trait]
impl ScreenshotSink for FileScreenshotSink {
    async fn store(&self, png: &[u8]) -> Result<String, ScreenshotError> {
        if png.is_empty() {
            return Err(ScreenshotError::Capture("empty image".to_string()));
        }

        let dir = self.dir.join("screenshots");
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.png", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&path, png).await?;

        info!("Saved failure screenshot to {}", path.display());
        Ok(path.display().to_string())
    }
}
