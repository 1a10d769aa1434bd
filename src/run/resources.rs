//! Scan resources and state management.
//!
//! This module defines the `ScanResources` struct which holds all initialized
//! resources needed for a URL scan operation, and the `ScanContext` shared by
//! every URL task.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::{ProcessingStats, ScanError};
use crate::fingerprint::Fingerprinter;
use crate::initialization::{init_client, init_semaphore};

use super::ScanResults;

/// State shared by every URL task.
pub struct ScanContext {
    /// HTTP client (User-Agent, timeout and redirect policy applied)
    pub client: Arc<reqwest::Client>,
    /// Technology detector
    pub fingerprinter: Arc<dyn Fingerprinter>,
    /// URL -> technologies for every successful URL
    pub results: Mutex<ScanResults>,
    /// Per-kind failure counters
    pub error_stats: ProcessingStats,
    /// Count of successfully processed URLs
    pub completed_urls: AtomicUsize,
    /// Count of failed URLs
    pub failed_urls: AtomicUsize,
    /// Non-empty lines in the input file
    pub total_urls: usize,
}

impl ScanContext {
    /// Stores the technologies found for `url` and counts it as completed.
    ///
    /// The lock is held only for the insert. A URL listed twice keeps the
    /// last result written.
    pub async fn record_success(&self, url: &str, technologies: BTreeSet<String>) {
        {
            let mut results = self.results.lock().await;
            results.insert(url.to_string(), technologies);
        }
        self.completed_urls.fetch_add(1, Ordering::SeqCst);
    }

    /// Counts a failed URL.
    pub fn record_failure(&self) {
        self.failed_urls.fetch_add(1, Ordering::SeqCst);
    }
}

/// All resources initialized for a scan operation.
pub struct ScanResources {
    /// Shared task state
    pub ctx: Arc<ScanContext>,
    /// Concurrency semaphore (one permit per in-flight fetch)
    pub semaphore: Arc<Semaphore>,
    /// Start time for elapsed time calculations
    pub start_time: std::time::Instant,
    /// Original configuration (for reference during finalization)
    pub config: Config,
}

/// Result of scan loop execution.
///
/// Contains information needed for finalization after the main scan loop completes.
pub struct ScanLoopResult {
    /// Cancellation token for logging task
    pub cancel: CancellationToken,
    /// Handle to the logging task
    pub logging_task: Option<tokio::task::JoinHandle<()>>,
}

/// Builds the HTTP client, semaphore and shared context for a scan.
///
/// # Errors
///
/// `ScanError::Initialization` if the HTTP client cannot be built.
pub fn init_scan_resources(
    config: Config,
    fingerprinter: Arc<dyn Fingerprinter>,
    total_urls: usize,
) -> Result<ScanResources, ScanError> {
    let client = init_client(&config)?;
    let semaphore = init_semaphore(config.concurrency);

    let ctx = Arc::new(ScanContext {
        client,
        fingerprinter,
        results: Mutex::new(ScanResults::new()),
        error_stats: ProcessingStats::new(),
        completed_urls: AtomicUsize::new(0),
        failed_urls: AtomicUsize::new(0),
        total_urls,
    });

    Ok(ScanResources {
        ctx,
        semaphore,
        start_time: std::time::Instant::now(),
        config,
    })
}
