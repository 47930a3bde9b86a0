//! Bearer session tokens.
//!
//! A token is 32 random bytes rendered as hex and handed to the client once.
//! Only its SHA-256 digest is stored, so a leaked `sessions` table cannot be
//! replayed. Expiry is enforced in the lookup query and expired rows are
//! purged by a background sweeper.

use std::fmt::Write;
use std::time::Duration as StdDuration;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::account::{USER_COLUMNS, User, user_from_row};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// SHA-256 of a token, hex encoded. This is the stored form.
#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme word is skipped whatever it is; only the second
/// space-separated part counts.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header.split(' ').nth(1).filter(|token| !token.is_empty())
}

/// Create a session for the given user, returning the raw token.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl: Duration) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let expires_at = OffsetDateTime::now_utc() + ttl;
    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Resolve an unexpired session token to its user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {USER_COLUMNS}
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = $1 AND s.expires_at > now()"
    );
    let row = sqlx::query(&sql).bind(hash_token(token)).fetch_optional(pool).await?;
    Ok(row.as_ref().map(user_from_row))
}

/// Delete a session by token. Returns false if it did not exist.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove every expired session, returning how many were deleted.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Spawn the expired-session sweeper. Returns a handle for shutdown.
pub fn spawn_session_sweeper(pool: PgPool, every_secs: u64) -> JoinHandle<()> {
    info!(every_secs, "session sweeper configured");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(StdDuration::from_secs(every_secs.max(1)));
        loop {
            interval.tick().await;
            match purge_expired(&pool).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "expired sessions purged"),
                Err(e) => warn!(error = %e, "session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
