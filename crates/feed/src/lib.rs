// ABOUTME: Feed pagination engine for vidstream.
// ABOUTME: Provides the video models, page merging, continuation policy, controller state machine and async session.

//! Incrementally growing, duplicate-free video feed.
//!
//! [`FeedController`] is a synchronous state machine: feed it [`FeedEvent`]s and
//! run the [`FetchRequest`]s it hands back. [`FeedSession`] does the running on
//! tokio for any [`PageFetcher`].
//!
//! ```no_run
//! use vidstream_feed::{FeedConfig, FeedSession, FetchFailure, PageFetcher, PageRequest, PageResult};
//!
//! struct Empty;
//!
//! impl PageFetcher for Empty {
//!     async fn fetch(&self, request: &PageRequest) -> Result<PageResult, FetchFailure> {
//!         Ok(PageResult { items: Vec::new(), requested_limit: request.page_size, total_count: None })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = FeedSession::new(Empty, FeedConfig::default());
//!     session.start("");
//!     session.settle_all().await;
//!     assert!(!session.state().has_more());
//! }
//! ```

pub mod accumulator;
pub mod continuation;
pub mod controller;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod session;

pub use accumulator::merge;
pub use continuation::has_more;
pub use controller::{FeedController, FeedEvent, FeedState, FeedStatus, FetchRequest};
pub use display::{age_label, format_duration};
pub use error::{FailureKind, FeedError, FetchFailure};
pub use fetcher::PageFetcher;
pub use models::{FeedConfig, PageRequest, PageResult, VideoSummary, DEFAULT_PAGE_SIZE};
pub use session::FeedSession;
