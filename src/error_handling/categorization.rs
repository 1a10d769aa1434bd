//! Error categorization.
//!
//! Maps reqwest and fetch failures onto the flat `ErrorType` counters.

use super::stats::ProcessingStats;
use super::types::{ErrorType, FetchError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Status codes are not inspected: the scanner never calls
/// `error_for_status`, so a 4xx/5xx page is a successful fetch.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Categorizes a fetch failure.
///
/// The fetch stage decides the coarse kind; reqwest's own flags refine
/// transport failures (connect vs. redirect vs. other).
pub fn categorize_fetch_error(error: &FetchError) -> ErrorType {
    match error {
        FetchError::RequestBuild { .. } => ErrorType::HttpRequestBuilderError,
        FetchError::Timeout { .. } => ErrorType::HttpRequestTimeoutError,
        FetchError::BodyRead { source, .. } => match categorize_reqwest_error(source) {
            ErrorType::HttpRequestDecodeError => ErrorType::HttpRequestDecodeError,
            _ => ErrorType::HttpRequestBodyError,
        },
        FetchError::Transport { source, .. } => categorize_reqwest_error(source),
    }
}

/// Updates processing statistics based on a fetch failure.
pub fn update_error_stats(stats: &ProcessingStats, error: &FetchError) {
    let error_type = categorize_fetch_error(error);
    stats.increment_error(error_type);
}
