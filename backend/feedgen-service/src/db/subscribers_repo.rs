//! Subscriber bookkeeping: a single idempotent upsert.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::error::{AppError, Result};

/// Insert the actor on first contact; a duplicate is a no-op, not an error.
pub async fn insert_if_absent(pool: &PgPool, did: &str, now: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO subscribers (did, indexed_at)
        VALUES ($1, $2)
        ON CONFLICT (did) DO NOTHING
        "#,
    )
    .bind(did)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        error!("Failed to register subscriber {}: {}", did, e);
        AppError::Database(e.to_string())
    })?;

    Ok(result.rows_affected() > 0)
}
