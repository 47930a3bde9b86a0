//! Procedure client for the auth server.
//!
//! Every procedure answers with the same envelope: `{"result":{"data":...}}`
//! on success or `{"error":{"code","message","httpStatus"}}` on failure.
//! Decoding lives in [`parse_envelope`] so it can be tested without a server.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::types::{AuthPayload, LoginInput, LogoutPayload, MePayload, RegisterInput, User};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3006/trpc";
const BASE_URL_ENV: &str = "AUTH_API_URL";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the call. `message` is meant for the user.
    #[error("{message}")]
    Rpc { code: String, message: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success status with a body that is not an error envelope.
    #[error("unexpected response: status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Server error code (`"UNAUTHORIZED"`, `"CONFLICT"`, ...) for rejected calls.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rpc { code, .. } => Some(code),
            _ => None,
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// The auth procedures the session store depends on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// # Errors
    ///
    /// `NOT_FOUND` for an unknown email, `UNAUTHORIZED` for a bad password.
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError>;

    /// # Errors
    ///
    /// `CONFLICT` when the email is taken, `BAD_REQUEST` on invalid input.
    async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<AuthPayload, ApiError>;

    /// Resolve the user behind a session token.
    ///
    /// # Errors
    ///
    /// `UNAUTHORIZED` for a missing, invalid or expired token.
    async fn me(&self, token: &str) -> Result<User, ApiError>;

    /// End the server-side session.
    ///
    /// # Errors
    ///
    /// Transport failures or `UNAUTHORIZED`.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    /// Build against `AUTH_API_URL`, or [`DEFAULT_BASE_URL`] when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(resolve_base_url(std::env::var(BASE_URL_ENV).ok()))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, procedure: &str) -> String {
        procedure_url(&self.base_url, procedure)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        parse_envelope(status, &text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let request = self
            .http
            .post(self.url("auth.login"))
            .json(&LoginInput { email, password });
        self.send(request).await
    }

    async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<AuthPayload, ApiError> {
        let request = self
            .http
            .post(self.url("auth.register"))
            .json(&RegisterInput { email, password, name });
        self.send(request).await
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        let request = self.http.get(self.url("auth.me")).bearer_auth(token);
        let payload: MePayload = self.send(request).await?;
        Ok(payload.user)
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.url("auth.logout")).bearer_auth(token);
        let payload: LogoutPayload = self.send(request).await?;
        if payload.success {
            Ok(())
        } else {
            Err(ApiError::Parse("logout reported success=false".to_owned()))
        }
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

#[derive(Deserialize)]
struct Envelope<T> {
    result: Option<ResultBody<T>>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ResultBody<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Decode a procedure response. An error envelope wins over the status code.
///
/// # Errors
///
/// [`ApiError::Rpc`] for an error envelope, [`ApiError::Status`] for a
/// non-success status without one, [`ApiError::Parse`] otherwise.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let success = (200..300).contains(&status);
    let envelope: Envelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => return Err(ApiError::Status { status, body: body.to_owned() }),
        Err(e) => return Err(ApiError::Parse(e.to_string())),
    };
    if let Some(error) = envelope.error {
        return Err(ApiError::Rpc { code: error.code, message: error.message });
    }
    match envelope.result {
        Some(result) if success => Ok(result.data),
        _ if !success => Err(ApiError::Status { status, body: body.to_owned() }),
        _ => Err(ApiError::Parse("response has neither result nor error".to_owned())),
    }
}

fn procedure_url(base_url: &str, procedure: &str) -> String {
    format!("{}/{procedure}", base_url.trim_end_matches('/'))
}

fn resolve_base_url(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
}
