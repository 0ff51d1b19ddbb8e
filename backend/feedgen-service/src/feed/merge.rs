//! Merge-rank stage: per-target reshare filtering and quota truncation,
//! then one global sort by recency.

use crate::models::ContentItem;

/// Everything fetched for one target, paired with its admission quota.
#[derive(Debug, Clone)]
pub struct TargetBatch {
    pub target: String,
    pub quota: usize,
    /// Items in source order (recency-descending by contract of the source)
    pub items: Vec<ContentItem>,
}

/// Produce the globally ordered candidate sequence.
///
/// Per target: reshares are dropped first, then the remainder is truncated
/// to the quota in source order. Truncation deliberately happens before the
/// global sort; the source's own per-target ordering is trusted.
///
/// Global order is `indexed_at` descending with ties broken by `post_uri`
/// ascending, so identical-timestamp inputs rank deterministically.
pub fn merge_rank(batches: Vec<TargetBatch>) -> Vec<ContentItem> {
    let mut candidates: Vec<ContentItem> = Vec::new();

    for batch in batches {
        candidates.extend(
            batch
                .items
                .into_iter()
                .filter(|item| item.is_original)
                .take(batch.quota),
        );
    }

    candidates.sort_by(|a, b| {
        b.indexed_at
            .cmp(&a.indexed_at)
            .then_with(|| a.post_uri.cmp(&b.post_uri))
    });

    candidates
}
