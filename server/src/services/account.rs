//! User accounts: registration, credential checks and lookup.
//!
//! Input is validated before any query runs. Emails are stored trimmed and
//! lower-cased, so lookups are case-insensitive. Passwords are hashed with
//! bcrypt on the blocking pool; the hash never leaves this module.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::rpc::ErrorCode;

const MIN_PASSWORD_CHARS: usize = 6;

/// Columns selected for a [`User`]; queries alias `users` as `u`.
pub(crate) const USER_COLUMNS: &str = "u.id, u.email, u.name, u.created_at, u.updated_at";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password must contain at least 6 character(s)")]
    PasswordTooShort,
    #[error("User already exists")]
    AlreadyExists,
    #[error("User not found")]
    NotFound,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for AccountError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEmail | Self::PasswordTooShort => "BAD_REQUEST",
            Self::AlreadyExists => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidPassword => "UNAUTHORIZED",
            Self::Hashing(_) | Self::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Public view of a user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub(crate) fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl NewAccount {
    /// # Errors
    ///
    /// `InvalidEmail` or `PasswordTooShort`.
    pub fn validate(email: &str, password: &str, name: Option<&str>) -> Result<Self, AccountError> {
        let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AccountError::PasswordTooShort);
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned);
        Ok(Self { email, password: password.to_owned(), name })
    }
}

/// Validated login input. Any non-empty password shape is accepted here;
/// the hash comparison decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// `InvalidEmail`.
    pub fn validate(email: &str, password: &str) -> Result<Self, AccountError> {
        let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
        Ok(Self { email, password: password.to_owned() })
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Trim and lower-case an address, or `None` if it is not `local@domain.tld`.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.contains('@') || normalized.chars().any(char::is_whitespace) {
        return None;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return None;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels.last().is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    (labels_ok && tld_ok).then_some(normalized)
}

// =============================================================================
// PASSWORDS
// =============================================================================

/// bcrypt-hash a password off the async executor.
///
/// # Errors
///
/// `Hashing` if bcrypt fails or the blocking task panics.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

/// Compare a password with a stored bcrypt hash off the async executor.
///
/// # Errors
///
/// `Hashing` if the stored hash is malformed or the blocking task panics.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

// =============================================================================
// QUERIES
// =============================================================================

/// Create a user.
///
/// # Errors
///
/// `AlreadyExists` if the email is taken (including a concurrent insert),
/// `Hashing` or `Database` otherwise.
pub async fn register(pool: &PgPool, input: NewAccount, bcrypt_cost: u32) -> Result<User, AccountError> {
    let existing = sqlx::query("SELECT 1 FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AccountError::AlreadyExists);
    }

    let password_hash = hash_password(input.password, bcrypt_cost).await?;
    let sql = format!(
        "INSERT INTO users AS u (id, email, password_hash, name)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(password_hash)
        .bind(&input.name)
        .fetch_one(pool)
        .await
        .map_err(insert_error)?;
    Ok(user_from_row(&row))
}

fn insert_error(e: sqlx::Error) -> AccountError {
    let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
    if unique { AccountError::AlreadyExists } else { AccountError::Database(e) }
}

/// Check credentials and return the matching user.
///
/// # Errors
///
/// `NotFound` for an unknown email, `InvalidPassword` for a wrong password.
pub async fn authenticate(pool: &PgPool, credentials: Credentials) -> Result<User, AccountError> {
    let sql = format!("SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.email = $1");
    let row = sqlx::query(&sql)
        .bind(&credentials.email)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::NotFound)?;

    let password_hash: String = row.get("password_hash");
    if !verify_password(credentials.password, password_hash).await? {
        return Err(AccountError::InvalidPassword);
    }
    Ok(user_from_row(&row))
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
