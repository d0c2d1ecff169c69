// ABOUTME: The main Client struct for the vidstream backend: video pages and owner profiles over HTTP.
// ABOUTME: Implements the feed engine's PageFetcher so a FeedSession can drive it directly.

use tracing::{debug, warn};
use url::Url;

use vidstream_feed::{FetchFailure, PageFetcher, PageRequest, PageResult};

use crate::error::ApiError;
use crate::options::{ClientBuilder, Options};
use crate::profile::OwnerProfile;
use crate::resource::{fetch, FetchOptions};
use crate::wire::{decode_page, Envelope};

const VIDEOS_PATH: &[&str] = &["api", "v1", "videos"];
const CURRENT_USER_PATH: &[&str] = &["api", "v1", "users", "current-user"];

/// HTTP client for the video backend.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    base_url: Url,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ApiError> {
        let base_url = Url::parse(&opts.base_url).map_err(|e| {
            ApiError::invalid_url(
                &opts.base_url,
                "NewClient",
                Some(anyhow::anyhow!("invalid base URL: {}", e)),
            )
        })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ApiError::invalid_url(
                &opts.base_url,
                "NewClient",
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    ApiError::config(
                        "NewClient",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };

        Ok(Self {
            opts,
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// URL of the video list endpoint for `request`.
    /// The `query` parameter is left out for an unfiltered feed.
    pub fn page_url(&self, request: &PageRequest) -> Result<Url, ApiError> {
        let mut url = self.endpoint(VIDEOS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &request.page_index.to_string())
                .append_pair("limit", &request.page_size.to_string());
            if !request.query.is_empty() {
                pairs.append_pair("query", &request.query);
            }
        }
        Ok(url)
    }

    /// Fetch one page of the video list.
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, ApiError> {
        let url = self.page_url(request)?;
        let result = fetch(&self.http_client, &url, "FetchPage", &self.fetch_options()).await?;
        let body: serde_json::Value = result.json("FetchPage")?;
        let page = decode_page(url.as_str(), body, request)?;
        debug!(
            page_index = request.page_index,
            items = page.items.len(),
            total = ?page.total_count,
            "fetched video page"
        );
        Ok(page)
    }

    /// Look up the public profile of a video owner.
    pub async fn owner_profile(&self, owner_id: &str) -> Result<OwnerProfile, ApiError> {
        let mut url = self.endpoint(CURRENT_USER_PATH)?;
        if owner_id.trim().is_empty() {
            return Err(ApiError::invalid_input(
                url.as_str(),
                "OwnerProfile",
                Some(anyhow::anyhow!("owner id is missing")),
            ));
        }
        url.query_pairs_mut().append_pair("userId", owner_id);

        let result = fetch(&self.http_client, &url, "OwnerProfile", &self.fetch_options())
            .await
            .inspect_err(|e| warn!(owner_id, error = %e, "failed to load owner profile"))?;
        let envelope: Envelope<OwnerProfile> = result.json("OwnerProfile")?;
        Ok(envelope.data)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::invalid_url(
                    self.base_url.as_str(),
                    "Endpoint",
                    Some(anyhow::anyhow!("base URL cannot hold a path")),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        url.set_query(None);
        Ok(url)
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.headers.clone(),
            bearer_token: self.opts.token.bearer_token(),
            max_body_bytes: self.opts.max_body_bytes,
        }
    }
}

impl PageFetcher for Client {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResult, FetchFailure> {
        self.fetch_page(request).await.map_err(FetchFailure::from)
    }
}
