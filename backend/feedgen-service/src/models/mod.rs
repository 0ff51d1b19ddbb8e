use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One like edge read from the interaction store.
///
/// `did` is the counterparty of the edge: the liked author for the
/// "likes by actor" query, the liker for the "likes on actor" query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeEdge {
    pub did: String,
    pub indexed_at: DateTime<Utc>,
}

/// A candidate post fetched from the content source.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub post_uri: String,
    pub indexed_at: DateTime<Utc>,
    /// False for reshares/boosts surfaced into an author feed
    pub is_original: bool,
}

/// One entry of the returned skeleton.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkeletonFeedPost {
    pub post: String,
}

/// Response body of `app.bsky.feed.getFeedSkeleton`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSkeleton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub feed: Vec<SkeletonFeedPost>,
}

impl FeedSkeleton {
    pub fn empty() -> Self {
        Self {
            cursor: None,
            feed: Vec::new(),
        }
    }
}
