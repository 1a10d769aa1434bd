//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};
use crate::run::ScanReport;

/// Logs a one-line summary of the run.
pub fn print_summary(report: &ScanReport) {
    info!(
        "✅ Processed {} URL{} ({} succeeded, {} failed) in {:.1}s - results written to {}",
        report.total_urls,
        if report.total_urls == 1 { "" } else { "s" },
        report.successful,
        report.failed,
        report.elapsed_seconds,
        report.output_path.display()
    );
}

/// Prints non-zero failure counts to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}
