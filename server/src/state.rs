//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor and
//! into the bearer-token extractor via `FromRef`.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Clone is required by Axum; the pool is reference-counted and the config
/// is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        Self { pool, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
