//! Registration results.

use serde::{Deserialize, Serialize};

/// Result of one registration job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    total: usize,
    failed: Vec<String>,
}

impl RegistrationOutcome {
    /// Build an outcome. Failures beyond `total` are dropped so the failure
    /// list can never outgrow the request.
    pub fn new(total: usize, mut failed: Vec<String>) -> Self {
        failed.truncate(total);
        Self { total, failed }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.failed.len()
    }

    pub fn into_failed(self) -> Vec<String> {
        self.failed
    }
}
