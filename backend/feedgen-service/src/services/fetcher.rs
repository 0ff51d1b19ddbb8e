//! Bounded fan-out over the content source.
//!
//! One fetch per target, at most `concurrency` in flight; a failing call is
//! logged and contributes an empty batch instead of aborting its siblings.
//! The join completes only once every target has settled.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::feed::TargetBatch;
use crate::metrics;
use crate::services::appview::{AuthorFeedFilter, ContentSource};

pub async fn fetch_all(
    source: Arc<dyn ContentSource>,
    quotas: HashMap<String, usize>,
    concurrency: usize,
    per_target_limit: u32,
    filter: AuthorFeedFilter,
) -> Vec<TargetBatch> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (target, quota) in quotas {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // Admission control: the call starts only once a slot frees.
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return TargetBatch {
                        target,
                        quota,
                        items: Vec::new(),
                    }
                }
            };

            metrics::FETCHES_TOTAL.inc();
            let items = match source.author_feed(&target, per_target_limit, filter).await {
                Ok(items) => items,
                Err(e) => {
                    metrics::FETCH_FAILURES_TOTAL.inc();
                    warn!("Failed to fetch author feed for {}: {}", target, e);
                    Vec::new()
                }
            };

            TargetBatch {
                target,
                quota,
                items,
            }
        });
    }

    let mut batches = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(batch) => batches.push(batch),
            Err(e) => warn!("Fetch task panicked: {}", e),
        }
    }
    batches
}
