//! Scan finalization.
//!
//! This module contains the `finalize_scan` function which handles
//! all cleanup and result output after the main scan loop completes.

use std::sync::atomic::Ordering;

use log::info;

use crate::app::{log_progress, print_error_statistics, print_summary, shutdown_gracefully};
use crate::error_handling::ScanError;
use crate::output::write_results;

use super::resources::{ScanLoopResult, ScanResources};
use super::ScanReport;

/// Finalize a scan run and produce the final report.
///
/// This function performs the following finalization steps:
/// 1. Shut down the progress logging task
/// 2. Log final progress
/// 3. Write the results file
/// 4. Print error statistics and the one-line summary
///
/// # Errors
///
/// `ScanError::Serialize` or `ScanError::Write` if the results cannot be written.
pub async fn finalize_scan(
    resources: ScanResources,
    loop_result: ScanLoopResult,
) -> Result<ScanReport, ScanError> {
    let ScanLoopResult {
        cancel,
        logging_task,
    } = loop_result;

    shutdown_gracefully(cancel, logging_task).await;

    let ctx = &resources.ctx;
    log_progress(
        resources.start_time,
        &ctx.completed_urls,
        &ctx.failed_urls,
        ctx.total_urls,
    );

    {
        let results = ctx.results.lock().await;
        write_results(&resources.config.output, &results).await?;
        info!(
            "Wrote {} result{} to {}",
            results.len(),
            if results.len() == 1 { "" } else { "s" },
            resources.config.output.display()
        );
    }

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();
    let report = ScanReport {
        total_urls: ctx.total_urls,
        successful: ctx.completed_urls.load(Ordering::SeqCst),
        failed: ctx.failed_urls.load(Ordering::SeqCst),
        output_path: resources.config.output.clone(),
        elapsed_seconds,
    };

    print_error_statistics(&ctx.error_stats);
    print_summary(&report);

    Ok(report)
}
