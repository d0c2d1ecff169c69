// ABOUTME: The PageFetcher trait: one bounded request for "page N of a query".
// ABOUTME: Implementations own transport, timeouts and response normalization.

use std::future::Future;

use crate::error::FetchFailure;
use crate::models::{PageRequest, PageResult};

/// Source of feed pages.
///
/// Implementations must return at most `request.page_size` items and report
/// transport errors, non-success statuses, timeouts and malformed payloads as
/// [`FetchFailure`]. Fetching has no side effects the engine can observe.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<PageResult, FetchFailure>> + Send;
}
