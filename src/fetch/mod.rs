//! HTTP fetching.
//!
//! One plain GET per URL. Status codes are not treated as failures: any
//! response that arrives with a readable body is handed to the fingerprinter.

use log::debug;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::error_handling::FetchError;

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status of the final response
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw (decompressed) body bytes
    pub body: Vec<u8>,
}

/// Issues a GET for `url` and reads the whole body.
///
/// The client carries the User-Agent, timeout and redirect policy (see
/// [`crate::initialization::init_client`]).
///
/// # Errors
///
/// - `FetchError::RequestBuild` if the URL cannot be turned into a request
/// - `FetchError::Timeout` if the request deadline expires while sending or reading
/// - `FetchError::Transport` for connection and other send failures
/// - `FetchError::BodyRead` if the body stream fails part-way
pub async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<FetchedResponse, FetchError> {
    let request = client
        .get(url)
        .build()
        .map_err(|source| FetchError::RequestBuild {
            url: url.to_string(),
            source,
        })?;

    let response = client.execute(request).await.map_err(|source| {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                source,
            }
        } else if source.is_builder() {
            FetchError::RequestBuild {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    })?;

    let final_url = response.url().to_string();
    let status = response.status();
    let headers = response.headers().clone();
    debug!("GET {url} -> {status} (final url: {final_url})");

    let body = response.bytes().await.map_err(|source| {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                source,
            }
        } else {
            FetchError::BodyRead {
                url: url.to_string(),
                source,
            }
        }
    })?;
    debug!("Body length for {url}: {} bytes", body.len());

    Ok(FetchedResponse {
        final_url,
        status,
        headers,
        body: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Server", "nginx/1.25.3")
                    .set_body_string("<html><body>hi</body></html>"),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = fetch_url(&client, &format!("{}/", server.uri()))
            .await
            .expect("Fetch should succeed");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response
                .headers
                .get("server")
                .and_then(|v| v.to_str().ok()),
            Some("nginx/1.25.3")
        );
        assert_eq!(response.body, b"<html><body>hi</body></html>");
    }

    #[tokio::test]
    async fn test_fetch_sends_client_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "techscan-test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .user_agent("techscan-test/1.0")
            .build()
            .expect("Failed to build client");
        fetch_url(&client, &server.uri())
            .await
            .expect("Fetch should succeed");
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let response = fetch_url(&client, &server.uri())
            .await
            .expect("A 404 page is still a response");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, b"Not Found");
    }

    #[tokio::test]
    async fn test_fetch_malformed_url_is_request_build_error() {
        let client = reqwest::Client::new();
        let err = fetch_url(&client, "not a url")
            .await
            .expect_err("Malformed URL should fail");
        match &err {
            FetchError::RequestBuild { url, source } => {
                assert_eq!(url, "not a url");
                assert!(source.is_builder());
            }
            other => panic!("Expected RequestBuild, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        let client = reqwest::Client::new();
        let err = fetch_url(&client, "http://127.0.0.1:1/")
            .await
            .expect_err("Connection should be refused");
        assert!(
            matches!(err, FetchError::Transport { .. }),
            "Expected Transport, got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_fetch_slow_server_is_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("Failed to build client");
        let err = fetch_url(&client, &server.uri())
            .await
            .expect_err("Request should time out");
        assert!(
            matches!(err, FetchError::Timeout { .. }),
            "Expected Timeout, got {:?}",
            err
        );
    }
}
