//! techscan library: concurrent web technology fingerprinting
//!
//! This library fetches a list of URLs with bounded concurrency, detects the
//! web technologies each response reveals (servers, frameworks, CMSs,
//! analytics, ...) and writes a JSON object mapping every successfully
//! fetched URL to its technology names.
//!
//! # Example
//!
//! ```no_run
//! use techscan::{Config, run_scan};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     list_file: PathBuf::from("urls.txt"),
//!     output: PathBuf::from("results.json"),
//!     concurrency: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("Processed {} URLs: {} succeeded, {} failed",
//!          report.total_urls, report.successful, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Custom fingerprinters
//!
//! Anything implementing [`Fingerprinter`] (including a plain
//! `Fn(&HeaderMap, &[u8]) -> BTreeSet<String>`) can replace the bundled
//! ruleset engine via [`run_scan_with`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod error_handling;
mod fetch;
mod fingerprint;
pub mod initialization;
mod input;
mod output;
mod run;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{FetchError, InitializationError, ScanError};
pub use fingerprint::{Fingerprinter, RulesetFingerprinter, Technology};
pub use run::{run_scan, run_scan_with, ScanReport, ScanResults};
