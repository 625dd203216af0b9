//! Fan-out of one identifier list over parallel browser sessions.

use std::sync::Arc;

use futures::future::join_all;
use mylist_protocols::Credentials;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::retry::RetryCoordinator;

/// Split `items` round-robin into exactly `n` chunks.
///
/// Item `i` lands in chunk `i % n`, so chunk sizes differ by at most one and
/// the larger chunks come first. `n == 0` is treated as 1. Chunks may be
/// empty when there are fewer items than chunks.
pub fn partition<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    let n = n.max(1);
    let mut chunks: Vec<Vec<T>> = (0..n)
        .map(|_| Vec::with_capacity(items.len() / n + 1))
        .collect();
    for (i, item) in items.iter().enumerate() {
        chunks[i % n].push(item.clone());
    }
    chunks
}

/// A worker that ended without a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerFailure {
    pub chunk_index: usize,
    pub error: String,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub workers: usize,
    pub chunk_sizes: Vec<usize>,
    /// Failed identifiers in chunk order.
    pub failed: Vec<String>,
    pub worker_errors: Vec<WorkerFailure>,
}

/// Runs one [`RetryCoordinator::register`] per chunk, at most `max_workers`
/// at a time across every dispatch sharing this value.
pub struct ChunkedDispatcher {
    coordinator: Arc<RetryCoordinator>,
    max_workers: usize,
    permits: Arc<Semaphore>,
}

impl ChunkedDispatcher {
    pub fn new(coordinator: Arc<RetryCoordinator>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            coordinator,
            max_workers,
            permits: Arc::new(Semaphore::new(max_workers)),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Register `identifiers` over `min(max_workers, len)` parallel sessions.
    ///
    /// A worker that errors or panics counts its whole chunk as failed; the
    /// other workers are unaffected.
    pub async fn dispatch(
        &self,
        credentials: &Credentials,
        identifiers: &[String],
    ) -> DispatchReport {
        if identifiers.is_empty() {
            return DispatchReport::default();
        }

        let workers = self.max_workers.min(identifiers.len());
        let chunks = partition(identifiers, workers);
        let chunk_sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        info!(
            "Dispatching {} identifiers over {} workers {:?}",
            identifiers.len(),
            workers,
            chunk_sizes
        );

        let handles: Vec<_> = chunks
            .iter()
            .cloned()
            .map(|chunk| {
                let coordinator = self.coordinator.clone();
                let permits = self.permits.clone();
                let credentials = credentials.clone();
                tokio::spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return Err(e.to_string()),
                    };
                    coordinator
                        .register(&credentials, &chunk)
                        .await
                        .map_err(|e| e.to_string())
                })
            })
            .collect();

        let mut report = DispatchReport {
            workers,
            chunk_sizes,
            ..DispatchReport::default()
        };
        let results = join_all(handles).await;
        for (chunk_index, (chunk, joined)) in chunks.into_iter().zip(results).enumerate() {
            let error = match joined {
                Ok(Ok(failed)) => {
                    report.failed.extend(failed);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(e) => format!("worker panicked: {}", e),
            };
            error!("Worker {} failed: {}", chunk_index, error);
            report.failed.extend(chunk);
            report.worker_errors.push(WorkerFailure { chunk_index, error });
        }

        info!(
            "Dispatch finished: {} of {} failed",
            report.failed.len(),
            identifiers.len()
        );
        report
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
