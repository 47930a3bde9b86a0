//! Process configuration read from the environment.
//!
//! `main` loads `.env` with `dotenvy` first, so everything here sees the
//! merged environment. Reads go through a lookup function so tests can feed
//! a fixed map instead of mutating process-global state.

use std::str::FromStr;

use time::Duration;

const DEFAULT_PORT: u16 = 3006;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "trpc_svelte_db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL or DB_PASSWORD must be set")]
    MissingDatabase,
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Lifetime of a freshly issued session token.
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    /// How often expired sessions are purged.
    pub session_sweep_secs: u64,
}

impl ServerConfig {
    /// # Errors
    ///
    /// See [`ServerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// `MissingDatabase` when neither `DB_PASSWORD` nor `DATABASE_URL` is set,
    /// `Invalid` when a value is present but does not parse or is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = database_url(&lookup)?;
        let session_ttl_days: i64 = env_parse(&lookup, "SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS)?;
        if session_ttl_days <= 0 {
            return Err(invalid("SESSION_TTL_DAYS", session_ttl_days));
        }
        let bcrypt_cost: u32 = env_parse(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(invalid("BCRYPT_COST", bcrypt_cost));
        }
        let db_max_connections: u32 = env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", db_max_connections));
        }

        Ok(Self {
            port: env_parse(&lookup, "PORT", DEFAULT_PORT)?,
            database_url,
            db_max_connections,
            session_ttl: Duration::days(session_ttl_days),
            bcrypt_cost,
            session_sweep_secs: env_parse(&lookup, "SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS)?,
        })
    }
}

/// Discrete `DB_*` settings win over `DATABASE_URL` when a password is given.
fn database_url(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    if let Some(password) = lookup("DB_PASSWORD").filter(|p| !p.is_empty()) {
        let host = lookup("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.into());
        let port: u16 = env_parse(lookup, "DB_PORT", DEFAULT_DB_PORT)?;
        let user = lookup("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.into());
        let name = lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.into());
        return Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"));
    }
    lookup("DATABASE_URL")
        .filter(|url| !url.trim().is_empty())
        .ok_or(ConfigError::MissingDatabase)
}

/// Parse `key`, falling back to `default` when unset or blank.
pub(crate) fn env_parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        _ => Ok(default),
    }
}

fn invalid(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid { key, value: value.to_string() }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
