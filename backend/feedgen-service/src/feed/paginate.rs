//! Stateless cursor pagination over the merged candidate sequence.
//!
//! All pagination state lives in the opaque cursor the caller round-trips;
//! nothing is kept server-side between pages.

use crate::feed::cursor;
use crate::models::ContentItem;

pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Clamp the requested page size to `[1, 100]`, defaulting to 100.
pub fn clamp_limit(requested: Option<u32>) -> usize {
    requested
        .map(|limit| (limit as usize).clamp(1, MAX_PAGE_SIZE))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Apply the cursor bound, slice one page, and derive the next cursor.
///
/// The bound is strict (`indexed_at < cursor`): the boundary item is never
/// re-served, and a run of identical timestamps cannot loop the client.
/// Items sharing the boundary timestamp that were not yet seen are skipped;
/// that is the accepted trade-off of the single-timestamp cursor.
pub fn paginate(
    mut candidates: Vec<ContentItem>,
    limit: usize,
    cursor_str: Option<&str>,
) -> (Vec<ContentItem>, Option<String>) {
    if let Some(boundary) = cursor_str.and_then(cursor::decode) {
        candidates.retain(|item| item.indexed_at < boundary);
    }

    if candidates.len() > limit {
        let next = cursor::encode(candidates[limit - 1].indexed_at);
        candidates.truncate(limit);
        (candidates, Some(next))
    } else {
        (candidates, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn candidates(n: usize) -> Vec<ContentItem> {
        // Newest first, strictly decreasing timestamps
        (0..n)
            .map(|i| ContentItem {
                post_uri: format!("at://did:example:t/app.bsky.feed.post/{}", i),
                indexed_at: ts((n - i) as i64),
                is_original: true,
            })
            .collect()
    }

    #[test]
    fn clamps_limit_into_valid_range() {
        assert_eq!(clamp_limit(None), 100);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1)), 1);
        assert_eq!(clamp_limit(Some(100)), 100);
        assert_eq!(clamp_limit(Some(101)), 100);
    }

    #[test]
    fn limit_beyond_candidates_returns_all_without_cursor() {
        let (page, next) = paginate(candidates(3), 100, None);
        assert_eq!(page.len(), 3);
        assert!(next.is_none());
    }

    #[test]
    fn next_cursor_points_at_page_boundary() {
        let all = candidates(5);
        let boundary = all[1].indexed_at;
        let (page, next) = paginate(all, 2, None);
        assert_eq!(page.len(), 2);
        assert_eq!(cursor::decode(next.as_deref().unwrap()), Some(boundary));
    }

    #[test]
    fn cursor_filter_is_strictly_older() {
        let all = candidates(5);
        let boundary = cursor::encode(all[2].indexed_at);
        let (page, next) = paginate(all.clone(), 100, Some(boundary.as_str()));
        // Only items 3 and 4 are strictly older than item 2.
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|i| i.indexed_at < all[2].indexed_at));
        assert!(next.is_none());
    }

    #[test]
    fn malformed_cursor_means_no_bound() {
        let (page, _) = paginate(candidates(4), 100, Some("???"));
        assert_eq!(page.len(), 4);
    }

    #[test]
    fn chained_pages_equal_one_double_page() {
        let all = candidates(8);

        let (first, next) = paginate(all.clone(), 3, None);
        let (second, _) = paginate(all.clone(), 3, next.as_deref());
        let chained: Vec<_> = first.into_iter().chain(second).collect();

        let (double, _) = paginate(all, 6, None);
        assert_eq!(chained, double);
    }

    #[test]
    fn exact_fit_has_no_next_cursor() {
        let (page, next) = paginate(candidates(4), 4, None);
        assert_eq!(page.len(), 4);
        assert!(next.is_none());
    }
}
