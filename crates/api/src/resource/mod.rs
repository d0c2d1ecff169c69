// ABOUTME: Resource handling module for fetching JSON resources from the backend.
// ABOUTME: Handles HTTP GETs with auth headers, content-length limits, status checks and JSON decoding.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::options::DEFAULT_MAX_BODY_BYTES;

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub bearer_token: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            bearer_token: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as JSON.
    ///
    /// A non-JSON content type is still decoded; it only shows up in logs and
    /// in the error when decoding fails.
    pub fn json<T: DeserializeOwned>(&self, op: &str) -> Result<T, ApiError> {
        let content_type = self.content_type.as_deref();
        let declared_json = content_type.map_or(true, |ct| ct.contains("json"));
        if !declared_json {
            debug!(url = %self.url, content_type, "decoding JSON from non-JSON content type");
        }

        serde_json::from_slice(&self.body).map_err(|e| {
            let reason = match content_type {
                Some(ct) if !declared_json => {
                    anyhow::anyhow!("invalid JSON body (content-type {}): {}", ct, e)
                }
                _ => anyhow::anyhow!("invalid JSON body: {}", e),
            };
            ApiError::decode(&self.url, op, Some(reason))
        })
    }
}

/// GET `url` and return the body of a 2xx response.
pub async fn fetch(
    client: &reqwest::Client,
    url: &Url,
    op: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ApiError> {
    let url_str = url.as_str();

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ApiError::invalid_url(
            url_str,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    // Build request
    let mut request = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(token) = &opts.bearer_token {
        request = request.bearer_auth(token);
    }
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!(url = url_str, op, "sending request");
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::from_reqwest(url_str, op, e))?;

    // Check Content-Length header before reading body
    if let Some(len) = response.content_length() {
        if len > opts.max_body_bytes as u64 {
            return Err(ApiError::fetch(
                url_str,
                op,
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    // Capture response metadata before consuming the response
    let status = response.status();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    // Check status before reading the body; error bodies are not needed
    if !status.is_success() {
        debug!(url = url_str, status = status.as_u16(), "non-success status");
        return Err(ApiError::status(url_str, op, status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::from_reqwest(url_str, op, e))?;

    if body.len() > opts.max_body_bytes {
        return Err(ApiError::fetch(
            url_str,
            op,
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    Ok(FetchResult {
        url: final_url,
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn create_test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .user_agent("test-agent")
            .build()
            .unwrap()
    }

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&server.url(path)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/test")
                .header("accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"ok":true}"#);
        });

        let client = create_test_client();
        let result = fetch(&client, &url(&server, "/test"), "Test", &FetchOptions::default()).await;
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.content_type.as_deref(), Some("application/json"));
        let value: serde_json::Value = result.json("Test").unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/auth")
                .header("authorization", "Bearer tok-123")
                .header("x-client", "tests");
            then.status(200).body("[]");
        });

        let client = create_test_client();
        let mut headers = HashMap::new();
        headers.insert("x-client".to_string(), "tests".to_string());
        let opts = FetchOptions {
            headers,
            bearer_token: Some("tok-123".to_string()),
            ..Default::default()
        };

        let result = fetch(&client, &url(&server, "/auth"), "Test", &opts).await;
        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let client = create_test_client();
        let err = fetch(&client, &url(&server, "/missing"), "Test", &FetchOptions::default())
            .await
            .expect_err("404 should fail");
        assert_eq!(err.code, ErrorCode::Status);
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/big");
            then.status(200).body("x".repeat(64));
        });

        let client = create_test_client();
        let opts = FetchOptions {
            max_body_bytes: 16,
            ..Default::default()
        };
        let err = fetch(&client, &url(&server, "/big"), "Test", &opts)
            .await
            .expect_err("oversized body should fail");
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500)).body("[]");
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = fetch(&client, &url(&server, "/slow"), "Test", &FetchOptions::default())
            .await
            .expect_err("slow response should time out");
        assert!(err.is_timeout(), "expected timeout, got {}", err);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let client = create_test_client();
        let url = Url::parse("ftp://example.com/videos").unwrap();
        let err = fetch(&client, &url, "Test", &FetchOptions::default())
            .await
            .expect_err("ftp should be rejected");
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_json_decode_error() {
        let result = FetchResult {
            url: "http://x/".to_string(),
            content_type: None,
            body: Bytes::from_static(b"<html>"),
        };
        let err = result
            .json::<serde_json::Value>("Test")
            .expect_err("html is not json");
        assert!(err.is_decode());
        assert!(!err.to_string().contains("content-type"), "got {}", err);
    }

    #[test]
    fn test_json_decode_error_names_non_json_content_type() {
        let result = FetchResult {
            url: "http://x/".to_string(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: Bytes::from_static(b"<html>"),
        };
        let err = result
            .json::<serde_json::Value>("Test")
            .expect_err("html is not json");
        assert!(err.is_decode());
        assert!(
            err.to_string().contains("content-type text/html"),
            "got {}",
            err
        );
    }

    #[test]
    fn test_json_decodes_despite_plain_text_content_type() {
        let result = FetchResult {
            url: "http://x/".to_string(),
            content_type: Some("text/plain".to_string()),
            body: Bytes::from_static(br#"{"data":[]}"#),
        };
        let value: serde_json::Value = result.json("Test").unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
    }
}
