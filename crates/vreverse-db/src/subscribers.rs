//! Database operations for the `subscribers` table.
//!
//! Every function normalizes the email it is given, so callers may pass raw
//! user input.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use vreverse_core::{normalize_email, AccessPolicy};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `subscribers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubscriberRow {
    pub email: String,
    pub last_event: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn require_email(raw: &str) -> Result<String, DbError> {
    normalize_email(raw).ok_or_else(|| DbError::InvalidEmail(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a subscriber or, when the email already exists, records the new
/// `last_event` and bumps `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::InvalidEmail`] if `email` does not normalize, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn upsert_subscriber(
    pool: &PgPool,
    email: &str,
    last_event: &str,
) -> Result<SubscriberRow, DbError> {
    let email = require_email(email)?;

    let row = sqlx::query_as::<_, SubscriberRow>(
        "INSERT INTO subscribers (email, last_event) \
         VALUES ($1, $2) \
         ON CONFLICT (email) DO UPDATE \
         SET last_event = EXCLUDED.last_event, updated_at = NOW() \
         RETURNING email, last_event, created_at, updated_at",
    )
    .bind(&email)
    .bind(last_event)
    .fetch_one(pool)
    .await?;

    tracing::info!(email = %row.email, last_event = %row.last_event, "subscriber upserted");
    Ok(row)
}

/// Deletes a subscriber.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matched, [`DbError::InvalidEmail`]
/// if `email` does not normalize, or [`DbError::Sqlx`] if the query fails.
pub async fn delete_subscriber(pool: &PgPool, email: &str) -> Result<(), DbError> {
    let email = require_email(email)?;

    let result = sqlx::query("DELETE FROM subscribers WHERE email = $1")
        .bind(&email)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns the subscriber for `email`, or `None` if absent or malformed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_subscriber(pool: &PgPool, email: &str) -> Result<Option<SubscriberRow>, DbError> {
    let Some(email) = normalize_email(email) else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, SubscriberRow>(
        "SELECT email, last_event, created_at, updated_at \
         FROM subscribers \
         WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns `true` if a row exists for the normalized `email`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn subscriber_exists(pool: &PgPool, email: &str) -> Result<bool, DbError> {
    let Some(email) = normalize_email(email) else {
        return Ok(false);
    };

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM subscribers WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Returns the most recently updated subscribers, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_subscribers(pool: &PgPool, limit: i64) -> Result<Vec<SubscriberRow>, DbError> {
    let rows = sqlx::query_as::<_, SubscriberRow>(
        "SELECT email, last_event, created_at, updated_at \
         FROM subscribers \
         ORDER BY updated_at DESC, email \
         LIMIT $1",
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// The subscription gate: admins always pass, everyone else needs a row.
///
/// A malformed email is denied without touching the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the lookup fails. Callers decide whether a
/// failed lookup denies access.
pub async fn check_access(
    pool: &PgPool,
    policy: &AccessPolicy,
    email: &str,
) -> Result<bool, DbError> {
    let Some(email) = normalize_email(email) else {
        return Ok(false);
    };
    if policy.is_admin(&email) {
        return Ok(true);
    }
    subscriber_exists(pool, &email).await
}
