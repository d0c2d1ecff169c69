// ABOUTME: Decides whether another page is worth requesting after a fetch.
// ABOUTME: A short page ends the feed; otherwise a reported total count may end it.

use crate::models::PageResult;

/// Returns true when a page after `page_index` might hold more items.
///
/// Rules, in order:
/// 1. Fewer than `page_size` items: no more data. This holds even when
///    `total_count` is missing or claims otherwise, since server counts can lag.
/// 2. `page_index * page_size >= total_count`: no more data.
/// 3. Otherwise more data may exist.
///
/// `page` must be the page exactly as fetched, before deduplication.
pub fn has_more(page: &PageResult, page_index: u32, page_size: u32) -> bool {
    if page.items.len() < page_size as usize {
        return false;
    }

    if let Some(total) = page.total_count {
        let seen = u64::from(page_index) * u64::from(page_size);
        if seen >= total {
            return false;
        }
    }

    true
}
