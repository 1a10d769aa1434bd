//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs progress information about URL processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed_urls` - Count of successfully processed URLs
/// * `failed_urls` - Count of failed URLs
/// * `total_urls` - Number of URLs in the input
pub fn log_progress(
    start_time: std::time::Instant,
    completed_urls: &AtomicUsize,
    failed_urls: &AtomicUsize,
    total_urls: usize,
) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = completed_urls.load(Ordering::SeqCst);
    let failed = failed_urls.load(Ordering::SeqCst);
    let processed = completed + failed;
    let rate = if elapsed_secs > 0.0 {
        processed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {}/{} URLs ({} failed) in {:.2} seconds (~{:.2} URLs/sec)",
        processed, total_urls, failed, elapsed_secs, rate
    );
}
