//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECTS};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client shared by every URL task.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from config
/// - Per-request timeout from config (`0` disables it)
/// - Redirect following (up to `MAX_REDIRECTS` hops)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails
/// (for example, a User-Agent that is not a valid header value).
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let mut builder = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
    if config.timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
    }
    let client = builder.build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_default_config() {
        let config = Config::default();
        assert!(init_client(&config).is_ok());
    }

    #[test]
    fn test_init_client_without_timeout() {
        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(init_client(&config).is_ok());
    }

    #[test]
    fn test_init_client_rejects_invalid_user_agent() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        match init_client(&config) {
            Err(InitializationError::HttpClientError(_)) => {}
            other => panic!("Expected HttpClientError, got {:?}", other.map(|_| ())),
        }
    }
}
