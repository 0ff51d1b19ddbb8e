//! Read-only queries over the `likes` table.
//!
//! Rows are written by the ingestion collaborator; one row per
//! `(did, uri)` pair, i.e. one like per post per actor.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::error::{AppError, Result};
use crate::models::LikeEdge;

/// Likes the actor performed, newest first. Feeds the like-tracer quota.
pub async fn recent_by_actor(pool: &PgPool, did: &str, limit: i64) -> Result<Vec<LikeEdge>> {
    sqlx::query_as::<_, LikeEdge>(
        r#"
        SELECT subject_did AS did, indexed_at
        FROM likes
        WHERE did = $1
        ORDER BY indexed_at DESC
        LIMIT $2
        "#,
    )
    .bind(did)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!("Failed to load likes by actor {}: {}", did, e);
        AppError::Database(e.to_string())
    })
}

/// Likes the actor received within the window, newest first.
/// Feeds the likes-back quota.
pub async fn recent_on_actor(
    pool: &PgPool,
    did: &str,
    since: DateTime<Utc>,
) -> Result<Vec<LikeEdge>> {
    sqlx::query_as::<_, LikeEdge>(
        r#"
        SELECT did, indexed_at
        FROM likes
        WHERE subject_did = $1
          AND indexed_at >= $2
        ORDER BY indexed_at DESC
        "#,
    )
    .bind(did)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!("Failed to load likes on actor {}: {}", did, e);
        AppError::Database(e.to_string())
    })
}
