//! Scan orchestration.
//!
//! One spawned task per URL, gated by a semaphore with `concurrency`
//! permits. Results go into a shared map behind a mutex; once every task has
//! been joined the map is written to the output file.

mod finalize;
mod resources;
mod task;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::log_progress;
use crate::config::{Config, LOGGING_INTERVAL, MAX_CONCURRENCY};
use crate::error_handling::{ErrorType, ScanError};
use crate::fingerprint::{init_fingerprinter, Fingerprinter};
use crate::input::read_url_list;

use finalize::finalize_scan;
use resources::{init_scan_resources, ScanLoopResult};
use task::{process_url_task, UrlTaskParams};

/// URL -> detected technology names.
///
/// Sorted maps keep the JSON output stable between runs.
pub type ScanResults = BTreeMap<String, BTreeSet<String>>;

/// Results of a URL scanning run.
///
/// Contains summary statistics about the completed scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Number of non-empty lines dispatched
    pub total_urls: usize,
    /// Number of URLs fetched and fingerprinted
    pub successful: usize,
    /// Number of URLs that failed (omitted from the output)
    pub failed: usize,
    /// Path of the JSON results file
    pub output_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs a URL scan with the provided configuration, using the ruleset
/// fingerprinter (`config.fingerprints`, or the bundled ruleset).
///
/// # Errors
///
/// This function will return an error if:
/// - The concurrency limit is zero or above [`MAX_CONCURRENCY`](crate::config::MAX_CONCURRENCY)
/// - The fingerprint ruleset cannot be loaded
/// - The URL list cannot be opened or read
/// - The HTTP client cannot be built
/// - The results cannot be serialized or written
///
/// Per-URL failures are never errors; those URLs are logged and omitted.
///
/// # Example
///
/// ```no_run
/// use techscan::{run_scan, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     list_file: PathBuf::from("urls.txt"),
///     output: PathBuf::from("results.json"),
///     ..Default::default()
/// };
/// let report = run_scan(config).await?;
/// println!("Processed {} URLs", report.total_urls);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan(config: Config) -> Result<ScanReport, ScanError> {
    let fingerprinter = init_fingerprinter(config.fingerprints.as_deref())
        .await
        .map_err(ScanError::Fingerprinter)?;
    run_scan_with(config, fingerprinter).await
}

/// Runs a URL scan with a caller-supplied fingerprinter.
///
/// `config.fingerprints` is ignored.
///
/// # Errors
///
/// Same as [`run_scan`], minus ruleset loading.
pub async fn run_scan_with(
    config: Config,
    fingerprinter: Arc<dyn Fingerprinter>,
) -> Result<ScanReport, ScanError> {
    if !(1..=MAX_CONCURRENCY).contains(&config.concurrency) {
        return Err(ScanError::InvalidConcurrency);
    }

    let urls = read_url_list(&config.list_file).await?;
    info!("Total URLs in file: {}", urls.len());

    let resources = init_scan_resources(config, fingerprinter, urls.len())?;
    info!(
        "Scanning {} URL{} with up to {} concurrent fetches",
        urls.len(),
        if urls.len() == 1 { "" } else { "s" },
        resources.config.concurrency
    );

    let mut tasks = FuturesUnordered::new();
    for url in urls {
        tasks.push(tokio::spawn(process_url_task(UrlTaskParams {
            url: Arc::from(url.as_str()),
            ctx: Arc::clone(&resources.ctx),
            semaphore: Arc::clone(&resources.semaphore),
        })));
    }

    let cancel = CancellationToken::new();
    let cancel_logging = cancel.child_token();
    let ctx_for_logging = Arc::clone(&resources.ctx);
    let start_time = resources.start_time;
    let logging_task = tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(
                        start_time,
                        &ctx_for_logging.completed_urls,
                        &ctx_for_logging.failed_urls,
                        ctx_for_logging.total_urls,
                    );
                }
                _ = cancel_logging.cancelled() => {
                    break;
                }
            }
        }
    });

    while let Some(task_result) = tasks.next().await {
        if let Err(join_error) = task_result {
            resources.ctx.failed_urls.fetch_add(1, Ordering::SeqCst);
            resources
                .ctx
                .error_stats
                .increment_error(ErrorType::TaskPanicked);
            warn!("Task panicked: {:?}", join_error);
        }
    }

    finalize_scan(
        resources,
        ScanLoopResult {
            cancel,
            logging_task: Some(logging_task),
        },
    )
    .await
}
