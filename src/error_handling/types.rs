//! Error type definitions.
//!
//! Errors come in two tiers:
//! - [`ScanError`]: fatal, the run cannot produce output
//! - [`FetchError`]: recoverable, a single URL is abandoned and omitted
//!
//! [`ErrorType`] is the flat counter key used for end-of-run statistics.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Fatal errors that abort a scan before any output is produced.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The concurrency limit was zero or above the semaphore's permit ceiling.
    #[error("Concurrency limit must be between 1 and {max}", max = crate::config::MAX_CONCURRENCY)]
    InvalidConcurrency,

    /// The URL list file could not be opened.
    #[error("Failed to open list file {}: {source}", .path.display())]
    ListOpen {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A read error occurred while scanning the URL list.
    #[error("Error reading list file {}: {source}", .path.display())]
    ListRead {
        /// Path being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The fingerprint ruleset could not be loaded.
    #[error("Failed to initialize fingerprinter: {0:#}")]
    Fingerprinter(#[source] anyhow::Error),

    /// Shared resources (HTTP client) could not be initialized.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The result map could not be serialized.
    #[error("Failed to marshal results: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("Failed to write output file {}: {source}", .path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Per-URL failures. The URL is logged and left out of the results.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be constructed (e.g. malformed URL).
    #[error("Failed to create request for {url}: {source}")]
    RequestBuild {
        /// URL as given in the list
        url: String,
        /// Underlying reqwest error
        #[source]
        source: ReqwestError,
    },

    /// Connection or transport failure while sending the request.
    #[error("Failed to GET {url}: {source}")]
    Transport {
        /// URL as given in the list
        url: String,
        /// Underlying reqwest error
        #[source]
        source: ReqwestError,
    },

    /// The per-request deadline expired.
    #[error("Timed out fetching {url}: {source}")]
    Timeout {
        /// URL as given in the list
        url: String,
        /// Underlying reqwest error
        #[source]
        source: ReqwestError,
    },

    /// The response body could not be read.
    #[error("Failed to read response from {url}: {source}")]
    BodyRead {
        /// URL as given in the list
        url: String,
        /// Underlying reqwest error
        #[source]
        source: ReqwestError,
    },
}

/// Types of errors that can occur during URL processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestRequestError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    // Task-level failures
    SemaphoreClosed,
    TaskPanicked,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::SemaphoreClosed => "Semaphore closed",
            ErrorType::TaskPanicked => "Task panicked",
        }
    }
}
