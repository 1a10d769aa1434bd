//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (fatal scan errors, per-URL fetch errors)
//! - Failure categorization from reqwest error flags
//! - Per-kind failure counters
//!
//! Only [`ScanError`] aborts a run. Every [`FetchError`] is logged, counted, and
//! the URL is left out of the output.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_fetch_error, categorize_reqwest_error, update_error_stats};
pub use stats::ProcessingStats;
pub use types::{ErrorType, FetchError, InitializationError, ScanError};
