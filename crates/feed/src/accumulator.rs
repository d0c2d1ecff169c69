// ABOUTME: Merges fetched pages into the running feed without duplicating ids.
// ABOUTME: Page 1 replaces the feed; later pages append entries whose ids are unseen.

use std::collections::HashSet;

use crate::models::{PageResult, VideoSummary};

/// Merges `page` (fetched as `page_index`) into `current`.
///
/// - Page 1 replaces `current` entirely, even when the page is empty.
/// - Later pages keep `current` and append the page entries whose id is not
///   already present, in page order.
///
/// Repeated ids inside a single page keep their first occurrence, so the
/// result never holds two entries with the same id.
pub fn merge(current: Vec<VideoSummary>, page: PageResult, page_index: u32) -> Vec<VideoSummary> {
    let mut items = if page_index <= 1 {
        Vec::with_capacity(page.items.len())
    } else {
        current
    };

    let mut seen: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
    items.reserve(page.items.len());

    for item in page.items {
        if seen.insert(item.id.clone()) {
            items.push(item);
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn video(id: &str) -> VideoSummary {
        VideoSummary {
            id: id.to_string(),
            title: format!("Video {}", id),
            ..Default::default()
        }
    }

    fn page(ids: &[&str]) -> PageResult {
        PageResult {
            items: ids.iter().map(|id| video(id)).collect(),
            requested_limit: 12,
            total_count: None,
        }
    }

    fn ids(items: &[VideoSummary]) -> Vec<&str> {
        items.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn first_page_replaces_existing_items() {
        let current = vec![video("x"), video("y")];
        let merged = merge(current, page(&["a", "b"]), 1);
        assert_eq!(ids(&merged), vec!["a", "b"]);
    }

    #[test]
    fn empty_first_page_clears_feed() {
        let merged = merge(vec![video("x")], page(&[]), 1);
        assert!(merged.is_empty());
    }

    #[test]
    fn later_page_appends_only_unseen_ids() {
        let current = vec![video("A"), video("B"), video("C")];
        let merged = merge(current, page(&["C", "D", "E"]), 2);
        assert_eq!(ids(&merged), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn later_page_preserves_page_order() {
        let current = vec![video("b")];
        let merged = merge(current, page(&["z", "b", "a", "m"]), 3);
        assert_eq!(ids(&merged), vec!["b", "z", "a", "m"]);
    }

    #[test]
    fn duplicate_keeps_first_fetched_fields() {
        let mut original = video("A");
        original.view_count = 1;
        let mut refetched = video("A");
        refetched.view_count = 99;
        refetched.title = "Renamed".to_string();

        let merged = merge(
            vec![original.clone()],
            PageResult {
                items: vec![refetched],
                requested_limit: 12,
                total_count: None,
            },
            2,
        );
        assert_eq!(merged, vec![original]);
    }

    #[test]
    fn repeated_ids_within_a_page_are_collapsed() {
        let merged = merge(Vec::new(), page(&["a", "b", "a"]), 1);
        assert_eq!(ids(&merged), vec!["a", "b"]);

        let merged = merge(vec![video("x")], page(&["y", "y", "x"]), 2);
        assert_eq!(ids(&merged), vec!["x", "y"]);
    }
}
