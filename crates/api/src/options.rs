// ABOUTME: Configuration options for the vidstream API client, and the ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{NoToken, StaticToken, TokenProvider};
use crate::client::Client;
use crate::error::ApiError;

/// Backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Maximum accepted response body (10 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Configuration options for the API client.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub token: Arc<dyn TokenProvider>,
    pub http_client: Option<reqwest::Client>,
    pub headers: HashMap<String, String>,
    pub max_body_bytes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("vidstream/", env!("CARGO_PKG_VERSION")).to_string(),
            token: Arc::new(NoToken),
            http_client: None,
            headers: HashMap::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the backend base URL, e.g. `https://api.example.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a fixed bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.opts.token = Arc::new(StaticToken::new(token));
        self
    }

    /// Use a custom token provider.
    pub fn token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.opts.token = Arc::new(provider);
        self
    }

    /// Use a custom HTTP client. Timeout and User-Agent settings are then
    /// the caller's responsibility.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set the maximum accepted response body size.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.opts.max_body_bytes = limit;
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, ApiError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
