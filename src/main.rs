//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `techscan` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use techscan::initialization::init_logger_with;
use techscan::{run_scan, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit with clap's code 2
    let opt = Opt::parse();

    let config = Config::from(opt);

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_scan(config).await {
        Ok(report) => {
            println!(
                "✅ Processed {} URL{} ({} succeeded, {} failed) in {:.1}s",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.elapsed_seconds
            );
            println!("Results saved in {}", report.output_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("techscan error: {:#}", anyhow::Error::from(e));
            process::exit(1);
        }
    }
}
