// ABOUTME: The feed controller state machine: owns FeedState and applies one event at a time.
// ABOUTME: Returns the fetch to dispatch (if any); stale or duplicate settlements are discarded.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::accumulator::merge;
use crate::continuation::has_more;
use crate::error::FetchFailure;
use crate::models::{FeedConfig, PageRequest, PageResult, VideoSummary};

/// Where the controller is in its fetch cycle.
///
/// `Loading` is the single-flight guard: no page is dispatched while it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedStatus {
    Idle,
    Loading { page_index: u32 },
    Error(FetchFailure),
}

/// State of one query's pagination session.
///
/// Only [`FeedController`] mutates it. A query change or retry replaces the
/// whole value with a fresh one under a new generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedState {
    query: String,
    items: Vec<VideoSummary>,
    next_page_index: u32,
    has_more: bool,
    status: FeedStatus,
    generation: u64,
}

impl FeedState {
    fn new(query: String, generation: u64) -> Self {
        Self {
            query,
            items: Vec::new(),
            next_page_index: 1,
            has_more: true,
            status: FeedStatus::Idle,
            generation,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Feed entries, unique by id, in first-fetched order.
    pub fn items(&self) -> &[VideoSummary] {
        &self.items
    }

    pub fn next_page_index(&self) -> u32 {
        self.next_page_index
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, FeedStatus::Loading { .. })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The failure that put the feed in the error state.
    pub fn last_error(&self) -> Option<&FetchFailure> {
        match &self.status {
            FeedStatus::Error(failure) => Some(failure),
            _ => None,
        }
    }

    /// True once every page has been loaded for a non-empty feed.
    pub fn end_reached(&self) -> bool {
        self.status == FeedStatus::Idle && !self.has_more && !self.items.is_empty()
    }

    /// Placeholder text for an idle, empty feed.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.status != FeedStatus::Idle || !self.items.is_empty() {
            return None;
        }
        if self.query.is_empty() {
            Some("No videos available.")
        } else {
            Some("No videos found matching your search.")
        }
    }
}

/// Inputs accepted by [`FeedController::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The search query changed; restart pagination from page 1.
    QueryChanged(String),
    /// The viewer is near the end of the list.
    LoadMoreRequested,
    /// The user asked to recover from an error.
    RetryRequested,
    /// A dispatched fetch finished.
    FetchSettled {
        generation: u64,
        page_index: u32,
        outcome: Result<PageResult, FetchFailure>,
    },
}

/// A fetch the caller must run, tagged with the generation it belongs to.
/// Its outcome must come back as [`FeedEvent::FetchSettled`] with the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub request: PageRequest,
}

/// Owns the feed state and sequences fetches for it.
#[derive(Debug, Clone)]
pub struct FeedController {
    config: FeedConfig,
    state: FeedState,
    next_generation: u64,
}

impl FeedController {
    /// Starts idle with an empty, unfiltered feed. The first
    /// `LoadMoreRequested` or `QueryChanged` fetches page 1.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            state: FeedState::new(String::new(), 0),
            next_generation: 1,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Applies one event and returns the fetch that must now be dispatched.
    pub fn handle(&mut self, event: FeedEvent) -> Option<FetchRequest> {
        match event {
            FeedEvent::QueryChanged(query) => self.reset(query),
            FeedEvent::LoadMoreRequested => self.load_more(),
            FeedEvent::RetryRequested => self.retry(),
            FeedEvent::FetchSettled {
                generation,
                page_index,
                outcome,
            } => {
                self.settle(generation, page_index, outcome);
                None
            }
        }
    }

    fn reset(&mut self, query: String) -> Option<FetchRequest> {
        let generation = self.next_generation;
        self.next_generation += 1;
        debug!(generation, query = %query, "starting feed session");
        self.state = FeedState::new(query, generation);
        self.request_page(1)
    }

    fn load_more(&mut self) -> Option<FetchRequest> {
        if self.state.status != FeedStatus::Idle || !self.state.has_more {
            return None;
        }
        self.request_page(self.state.next_page_index)
    }

    fn retry(&mut self) -> Option<FetchRequest> {
        if !matches!(self.state.status, FeedStatus::Error(_)) {
            return None;
        }
        let query = self.state.query.clone();
        self.reset(query)
    }

    fn request_page(&mut self, page_index: u32) -> Option<FetchRequest> {
        if self.state.status != FeedStatus::Idle {
            debug!(page_index, "page request dropped: fetch already in flight");
            return None;
        }

        self.state.status = FeedStatus::Loading { page_index };
        let request = PageRequest {
            page_index,
            page_size: self.config.page_size(),
            query: self.state.query.clone(),
        };
        debug!(
            generation = self.state.generation,
            page_index,
            query = %request.query,
            "dispatching page fetch"
        );

        Some(FetchRequest {
            generation: self.state.generation,
            request,
        })
    }

    fn settle(
        &mut self,
        generation: u64,
        page_index: u32,
        outcome: Result<PageResult, FetchFailure>,
    ) {
        if generation != self.state.generation {
            debug!(
                generation,
                current = self.state.generation,
                page_index,
                "discarding stale page result"
            );
            return;
        }

        match self.state.status {
            FeedStatus::Loading { page_index: in_flight } if in_flight == page_index => {}
            _ => {
                debug!(page_index, "discarding unexpected page result");
                return;
            }
        }

        match outcome {
            Ok(page) => {
                let page_size = self.config.page_size();
                let more = has_more(&page, page_index, page_size);
                let received = page.items.len();
                let current = std::mem::take(&mut self.state.items);
                self.state.items = merge(current, page, page_index);
                self.state.has_more = more;
                self.state.next_page_index = page_index.saturating_add(1);
                self.state.status = FeedStatus::Idle;
                info!(
                    page_index,
                    received,
                    total = self.state.items.len(),
                    has_more = more,
                    "page loaded"
                );
            }
            Err(failure) => {
                warn!(page_index, error = %failure, "page fetch failed");
                self.state.has_more = false;
                self.state.status = FeedStatus::Error(failure);
            }
        }
    }
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}
