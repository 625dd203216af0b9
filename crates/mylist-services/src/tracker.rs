//! Marker-file completion tracking.

use std::path::PathBuf;

use async_trait::async_trait;
use mylist_config::TrackingConfig;
use mylist_protocols::{ChunkMarker, CompletionTracker, TrackerError};
use tracing::debug;

/// One file per in-flight chunk: `<dir>/<prefix>-<job>-<chunk>`.
#[derive(Debug, Clone)]
pub struct FileCompletionTracker {
    dir: PathBuf,
    prefix: String,
}

impl FileCompletionTracker {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.dir.clone(), config.prefix.clone())
    }

    fn job_prefix(&self, job_id: &str) -> Result<String, TrackerError> {
        validate_component(job_id)?;
        Ok(format!("{}-{}-", self.prefix, job_id))
    }

    fn marker_path(&self, marker: &ChunkMarker) -> Result<PathBuf, TrackerError> {
        validate_component(&marker.chunk_index)?;
        let name = format!("{}{}", self.job_prefix(&marker.job_id)?, marker.chunk_index);
        Ok(self.dir.join(name))
    }
}

fn validate_component(value: &str) -> Result<(), TrackerError> {
    if value.is_empty() || value.contains(['/', '\\']) || value.contains("..") {
        return Err(TrackerError::InvalidMarker(value.to_string()));
    }
    Ok(())
}

#[async_trait]
impl CompletionTracker for FileCompletionTracker {
    async fn begin(&self, marker: &ChunkMarker) -> Result<(), TrackerError> {
        let path = self.marker_path(marker)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, b"processing").await?;
        debug!("Created tracking marker {}", path.display());
        Ok(())
    }

    async fn finish(&self, marker: &ChunkMarker) -> Result<(), TrackerError> {
        let path = self.marker_path(marker)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed tracking marker {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_complete(&self, job_id: &str) -> Result<bool, TrackerError> {
        let prefix = self.job_prefix(job_id)?;
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
