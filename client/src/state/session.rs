//! Signed-in user and session token.
//!
//! DESIGN
//! ======
//! Every transition is a single request followed by a single state write, so
//! callers never observe a half-applied session: a call either establishes
//! `{user, token}` (token persisted) or leaves the store unauthenticated.
//! Failed sign-ins and rejected stored tokens clear the persisted token.
//! Nothing is retried.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::api::AuthApi;
use crate::net::types::{AuthPayload, User};
use crate::util::storage::{TOKEN_KEY, TokenStore};
use crate::util::validate;

/// Snapshot of the session. `is_authenticated` is true iff `user` and
/// `token` are both present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl AuthState {
    fn signed_in(user: User, token: String) -> Self {
        Self { user: Some(user), token: Some(token), is_authenticated: true }
    }
}

/// A failed session operation, with a message fit for the login form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

pub struct AuthSession<A, S> {
    api: A,
    store: S,
    state: AuthState,
}

impl<A: AuthApi, S: TokenStore> AuthSession<A, S> {
    /// Starts unauthenticated; call [`Self::initialize`] to restore a stored session.
    pub fn new(api: A, store: S) -> Self {
        Self { api, store, state: AuthState::default() }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Sign in. Invalid input is rejected with no request and no state change;
    /// any later failure resets the session and removes the stored token.
    ///
    /// # Errors
    ///
    /// Validation failures and server rejections.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AuthFailure> {
        validate::validate_login(email, password).map_err(|e| AuthFailure::new(e.to_string()))?;
        let email = email.trim();
        match self.api.login(email, password).await {
            Ok(payload) => {
                let result = self.establish(payload);
                if result.is_err() {
                    self.reset();
                }
                result
            }
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                self.reset();
                Err(AuthFailure::new(e.to_string()))
            }
        }
    }

    /// Create an account and sign in as it. A failed registration leaves the
    /// current session untouched.
    ///
    /// # Errors
    ///
    /// Validation failures (no request is sent) and server rejections such as
    /// `"User already exists"`.
    pub async fn register(&mut self, email: &str, password: &str, name: Option<&str>) -> Result<(), AuthFailure> {
        validate::validate_registration(email, password).map_err(|e| AuthFailure::new(e.to_string()))?;
        let email = email.trim();
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        match self.api.register(email, password, name).await {
            Ok(payload) => self.establish(payload),
            Err(e) => {
                tracing::info!(error = %e, "registration failed");
                Err(AuthFailure::new(e.to_string()))
            }
        }
    }

    /// Drop the session locally and ask the server to forget it. Server or
    /// storage failures are logged, never surfaced: the user is signed out
    /// locally regardless.
    pub async fn logout(&mut self) {
        if let Some(token) = self.state.token.take() {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "server logout failed");
            }
        }
        self.reset();
        tracing::info!("logged out");
    }

    /// Restore the session from the stored token, if any.
    ///
    /// No stored token leaves the store unauthenticated and succeeds. A
    /// rejected token is removed and reported.
    ///
    /// # Errors
    ///
    /// The stored token could not be read or the server rejected it.
    pub async fn initialize(&mut self) -> Result<(), AuthFailure> {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                self.state = AuthState::default();
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "reading stored token failed");
                self.reset();
                return Err(AuthFailure::new(e.to_string()));
            }
        };
        match self.api.me(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "session restored");
                self.state = AuthState::signed_in(user, token);
                Ok(())
            }
            Err(e) => {
                tracing::info!(error = %e, "stored session rejected");
                self.reset();
                Err(AuthFailure::new(e.to_string()))
            }
        }
    }

    fn establish(&mut self, payload: AuthPayload) -> Result<(), AuthFailure> {
        let AuthPayload { user, token } = payload;
        if let Err(e) = self.store.set(TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "persisting token failed");
            return Err(AuthFailure::new(e.to_string()));
        }
        tracing::info!(user_id = %user.id, "signed in");
        self.state = AuthState::signed_in(user, token);
        Ok(())
    }

    fn reset(&mut self) {
        self.state = AuthState::default();
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "removing stored token failed");
        }
    }
}
