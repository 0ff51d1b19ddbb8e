//! Interaction store access
//!
//! The store is append-only from the ingestion side; this service only
//! reads like edges and performs the idempotent subscriber upsert.

pub mod likes_repo;
pub mod subscribers_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::LikeEdge;

/// Read/registration surface the feed algorithms depend on.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Idempotent insert-or-ignore registration of the requesting actor.
    /// Returns true when a new row was written.
    async fn register_subscriber(&self, did: &str, now: DateTime<Utc>) -> Result<bool>;

    /// Most recent likes performed by `did`, newest first, capped at `limit`.
    /// The returned edge `did` is the liked author.
    async fn recent_likes_by_actor(&self, did: &str, limit: i64) -> Result<Vec<LikeEdge>>;

    /// Likes received by `did` since `since`, newest first.
    /// The returned edge `did` is the liker.
    async fn recent_likes_on_actor(&self, did: &str, since: DateTime<Utc>)
        -> Result<Vec<LikeEdge>>;
}

/// Postgres-backed implementation over the shared pool.
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    async fn register_subscriber(&self, did: &str, now: DateTime<Utc>) -> Result<bool> {
        subscribers_repo::insert_if_absent(&self.pool, did, now).await
    }

    async fn recent_likes_by_actor(&self, did: &str, limit: i64) -> Result<Vec<LikeEdge>> {
        likes_repo::recent_by_actor(&self.pool, did, limit).await
    }

    async fn recent_likes_on_actor(
        &self,
        did: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<LikeEdge>> {
        likes_repo::recent_on_actor(&self.pool, did, since).await
    }
}
