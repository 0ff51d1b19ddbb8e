//! Quota from the requester's own recent likes: the more often an author
//! was liked, the more of their posts are admitted.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::algos::{quotas_from, run_pipeline, AlgoContext, FeedAlgorithm, FeedQuery};
use crate::error::Result;
use crate::models::FeedSkeleton;
use crate::services::appview::AuthorFeedFilter;

pub const SHORTNAME: &str = "likeTracer";

pub struct LikeTracer;

#[async_trait]
impl FeedAlgorithm for LikeTracer {
    fn shortname(&self) -> &'static str {
        SHORTNAME
    }

    async fn produce(
        &self,
        ctx: &AlgoContext,
        query: &FeedQuery,
        requester_did: &str,
    ) -> Result<FeedSkeleton> {
        // Side effect only; a duplicate registration is a no-op.
        if ctx.store.register_subscriber(requester_did, Utc::now()).await? {
            info!("[{}] subscriber registered", requester_did);
        }

        let edges = ctx
            .store
            .recent_likes_by_actor(requester_did, ctx.settings.interaction_scan_limit)
            .await?;
        if edges.is_empty() {
            return Ok(FeedSkeleton::empty());
        }

        let quotas = quotas_from(&edges);
        let target_count = quotas.len();

        let skeleton = run_pipeline(
            ctx,
            query,
            quotas,
            AuthorFeedFilter::PostsAndAuthorThreads,
        )
        .await?;

        info!(
            "[{}] like targets: {}, posts: {}, cursor: {:?}",
            requester_did,
            target_count,
            skeleton.feed.len(),
            skeleton.cursor
        );
        Ok(skeleton)
    }
}
