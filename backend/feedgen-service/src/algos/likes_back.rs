//! Quota from likes the requester received within the last day: the feed
//! surfaces posts by the people who liked them back.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use crate::algos::{quotas_from, run_pipeline, AlgoContext, FeedAlgorithm, FeedQuery};
use crate::error::Result;
use crate::models::FeedSkeleton;
use crate::services::appview::AuthorFeedFilter;

pub const SHORTNAME: &str = "likesBack";

pub struct LikesBack;

#[async_trait]
impl FeedAlgorithm for LikesBack {
    fn shortname(&self) -> &'static str {
        SHORTNAME
    }

    async fn produce(
        &self,
        ctx: &AlgoContext,
        query: &FeedQuery,
        requester_did: &str,
    ) -> Result<FeedSkeleton> {
        if ctx.store.register_subscriber(requester_did, Utc::now()).await? {
            info!("[{}] subscriber registered", requester_did);
        }

        let since = Utc::now() - Duration::hours(ctx.settings.likes_back_window_hours);
        let edges = ctx
            .store
            .recent_likes_on_actor(requester_did, since)
            .await?;
        if edges.is_empty() {
            return Ok(FeedSkeleton::empty());
        }

        let quotas = quotas_from(&edges);
        let liker_count = quotas.len();

        let skeleton =
            run_pipeline(ctx, query, quotas, AuthorFeedFilter::PostsNoReplies).await?;

        info!(
            "[{}] liked by: {}, posts: {}, cursor: {:?}",
            requester_did,
            liker_count,
            skeleton.feed.len(),
            skeleton.cursor
        );
        Ok(skeleton)
    }
}
