//! Feed algorithms.
//!
//! Both published variants share one pipeline: derive per-target quotas
//! from like edges, fan out to the content source, merge-rank, paginate.
//! They differ only in which side of the like edge drives the quota and in
//! the source-side filter.

pub mod like_tracer;
pub mod likes_back;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::FeedSettings;
use crate::db::InteractionStore;
use crate::error::Result;
use crate::feed::{clamp_limit, merge_rank, paginate};
use crate::models::{FeedSkeleton, LikeEdge, SkeletonFeedPost};
use crate::services::appview::AuthorFeedFilter;
use crate::services::{fetch_all, ContentSource};

pub use like_tracer::LikeTracer;
pub use likes_back::LikesBack;

/// Pagination parameters of one skeleton request.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Collaborators shared by all algorithms for the lifetime of the process.
pub struct AlgoContext {
    pub store: Arc<dyn InteractionStore>,
    pub source: Arc<dyn ContentSource>,
    pub settings: FeedSettings,
}

#[async_trait]
pub trait FeedAlgorithm: Send + Sync {
    /// Record key of the published feed generator record.
    fn shortname(&self) -> &'static str;

    async fn produce(
        &self,
        ctx: &AlgoContext,
        query: &FeedQuery,
        requester_did: &str,
    ) -> Result<FeedSkeleton>;
}

/// Registered algorithms, keyed by shortname.
pub struct AlgoRegistry {
    algos: Vec<Arc<dyn FeedAlgorithm>>,
}

impl AlgoRegistry {
    pub fn with_defaults() -> Self {
        Self {
            algos: vec![Arc::new(LikeTracer), Arc::new(LikesBack)],
        }
    }

    pub fn get(&self, shortname: &str) -> Option<Arc<dyn FeedAlgorithm>> {
        self.algos
            .iter()
            .find(|algo| algo.shortname() == shortname)
            .cloned()
    }

    pub fn shortnames(&self) -> Vec<&'static str> {
        self.algos.iter().map(|algo| algo.shortname()).collect()
    }
}

/// Group like edges into per-target quotas. Targets only appear with a
/// count of at least one.
fn quotas_from(edges: &[LikeEdge]) -> HashMap<String, usize> {
    let mut quotas: HashMap<String, usize> = HashMap::new();
    for edge in edges {
        *quotas.entry(edge.did.clone()).or_insert(0) += 1;
    }
    quotas
}

/// Fan out, merge-rank and paginate: the part both variants share.
async fn run_pipeline(
    ctx: &AlgoContext,
    query: &FeedQuery,
    quotas: HashMap<String, usize>,
    filter: AuthorFeedFilter,
) -> Result<FeedSkeleton> {
    if quotas.is_empty() {
        return Ok(FeedSkeleton::empty());
    }

    let batches = fetch_all(
        Arc::clone(&ctx.source),
        quotas,
        ctx.settings.fetch_concurrency,
        ctx.settings.fetch_page_limit,
        filter,
    )
    .await;

    let candidates = merge_rank(batches);
    let (items, cursor) = paginate(candidates, clamp_limit(query.limit), query.cursor.as_deref());

    Ok(FeedSkeleton {
        cursor,
        feed: items
            .into_iter()
            .map(|item| SkeletonFeedPost {
                post: item.post_uri,
            })
            .collect(),
    })
}
