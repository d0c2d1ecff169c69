// ABOUTME: Core models for the video feed: VideoSummary, PageRequest, PageResult, FeedConfig.
// ABOUTME: VideoSummary identity is its id alone; all other fields are opaque to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::display::{age_label, format_duration};
use crate::error::FeedError;

/// Page size used by the feed unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// One entry of the feed.
///
/// `id` is the only identity key. Two summaries with the same id are the same
/// video even if every other field differs between fetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub media_url: String,
    pub duration_seconds: f64,
    pub view_count: u64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl VideoSummary {
    /// Duration as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }

    /// Coarse relative age such as "3 days ago".
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        age_label(self.created_at, now)
    }
}

/// Arguments of one page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based.
    pub page_index: u32,
    pub page_size: u32,
    /// Empty means unfiltered.
    pub query: String,
}

impl PageRequest {
    pub fn new(page_index: u32, page_size: u32, query: impl Into<String>) -> Result<Self, FeedError> {
        if page_index == 0 {
            return Err(FeedError::InvalidPageIndex(page_index));
        }
        if page_size == 0 {
            return Err(FeedError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index,
            page_size,
            query: query.into(),
        })
    }
}

/// Outcome of one successful page fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Server order; the engine never reorders.
    pub items: Vec<VideoSummary>,
    pub requested_limit: u32,
    /// Total items matching the query, when the backend reports it.
    pub total_count: Option<u64>,
}

/// Feed engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    page_size: u32,
}

impl FeedConfig {
    pub fn new(page_size: u32) -> Result<Self, FeedError> {
        if page_size == 0 {
            return Err(FeedError::InvalidPageSize(page_size));
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
