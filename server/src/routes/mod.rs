//! Router assembly.
//!
//! Procedures are mounted under `/trpc/<router>.<procedure>`: mutations take
//! `POST` with a JSON body, queries take `GET`. Anything else under the
//! router answers with the procedure error envelope.

pub mod auth;

use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::rpc::{RpcCode, RpcError};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/trpc/auth.register", post(auth::register))
        .route("/trpc/auth.login", post(auth::login))
        .route("/trpc/auth.me", get(auth::me))
        .route("/trpc/auth.logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .fallback(no_procedure)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn no_procedure(uri: Uri) -> RpcError {
    RpcError::new(RpcCode::NotFound, format!("No procedure found on path \"{}\"", uri.path()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
