//! Configuration constants.
//!
//! This module defines the defaults and operational limits used throughout the
//! scanner.

/// Default number of concurrent fetches (`-t`).
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Largest accepted concurrency limit (the semaphore's permit ceiling).
pub const MAX_CONCURRENCY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Interval between progress log lines, in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Default per-request timeout in seconds.
///
/// A value of `0` passed on the command line disables the timeout entirely.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects followed per request.
pub const MAX_REDIRECTS: usize = 10;

/// Default User-Agent string for HTTP requests.
///
/// Mimics a desktop Chrome browser on Windows so sites serve the same markup
/// they would serve a real visitor. Users can override this via `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";
