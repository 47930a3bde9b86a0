//! Auth procedures: register, login, me, logout.
//!
//! Clients authenticate with `Authorization: Bearer <token>`. The token is
//! issued by register/login and resolved per request by [`AuthUser`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::rpc::{RpcError, RpcOk, RpcResult};
use crate::services::account::{self, Credentials, NewAccount, User};
use crate::services::session;
use crate::state::AppState;

const NO_AUTH_HEADER: &str = "No authorization header";
const INVALID_TOKEN: &str = "Invalid or expired token";

fn session_store_failed(e: sqlx::Error) -> RpcError {
    error!(error = %e, "session store failed");
    RpcError::internal()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the bearer token.
/// Use as a handler parameter to require authentication.
#[derive(Debug)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| RpcError::unauthorized(NO_AUTH_HEADER))?;
        let token = header
            .to_str()
            .ok()
            .and_then(session::bearer_token)
            .ok_or_else(|| RpcError::unauthorized(INVALID_TOKEN))?;

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(session_store_failed)?
            .ok_or_else(|| RpcError::unauthorized(INVALID_TOKEN))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MePayload {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LogoutPayload {
    pub success: bool,
}

fn json_input<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RpcError> {
    payload.map(|Json(input)| input).map_err(|e| RpcError::bad_request(e.body_text()))
}

async fn issue_token(state: &AppState, user: &User) -> Result<String, RpcError> {
    session::create_session(&state.pool, user.id, state.config.session_ttl)
        .await
        .map_err(session_store_failed)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /trpc/auth.register`: create a user and open a session.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> RpcResult<AuthPayload> {
    let input = json_input(payload)?;
    let account = NewAccount::validate(&input.email, &input.password, input.name.as_deref())
        .map_err(|e| RpcError::from_service(&e))?;
    let user = account::register(&state.pool, account, state.config.bcrypt_cost)
        .await
        .map_err(|e| RpcError::from_service(&e))?;
    let token = issue_token(&state, &user).await?;
    info!(user_id = %user.id, "user registered");
    Ok(RpcOk(AuthPayload { user, token }))
}

/// `POST /trpc/auth.login`: check credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> RpcResult<AuthPayload> {
    let input = json_input(payload)?;
    let credentials = Credentials::validate(&input.email, &input.password).map_err(|e| RpcError::from_service(&e))?;
    let user = account::authenticate(&state.pool, credentials)
        .await
        .map_err(|e| RpcError::from_service(&e))?;
    let token = issue_token(&state, &user).await?;
    info!(user_id = %user.id, "user logged in");
    Ok(RpcOk(AuthPayload { user, token }))
}

/// `GET /trpc/auth.me`: the user behind the bearer token.
pub async fn me(auth: AuthUser) -> RpcResult<MePayload> {
    Ok(RpcOk(MePayload { user: auth.user }))
}

/// `POST /trpc/auth.logout`: revoke the bearer token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> RpcResult<LogoutPayload> {
    let success = session::delete_session(&state.pool, &auth.token)
        .await
        .map_err(session_store_failed)?;
    info!(user_id = %auth.user.id, "user logged out");
    Ok(RpcOk(LogoutPayload { success }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
