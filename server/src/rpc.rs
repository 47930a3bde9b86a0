//! Typed-procedure envelope.
//!
//! Successful calls answer `{"result":{"data":...}}`. Failures answer
//! `{"error":{"code":"CONFLICT","message":"...","httpStatus":409}}` with the
//! matching HTTP status, so clients can branch on `code` without parsing
//! messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable procedure error code for a service error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Procedure error codes and the HTTP status each one travels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    InternalServerError,
}

impl RpcCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Unknown codes are treated as internal errors.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "BAD_REQUEST" => Self::BadRequest,
            "UNAUTHORIZED" => Self::Unauthorized,
            "NOT_FOUND" => Self::NotFound,
            "CONFLICT" => Self::Conflict,
            _ => Self::InternalServerError,
        }
    }

    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: RpcCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(RpcCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Unauthorized, message)
    }

    /// Internal details stay in the log; callers get a generic message.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(RpcCode::InternalServerError, "Internal server error")
    }

    /// Map a coded service error. Internal failures are logged and masked.
    pub fn from_service(err: &(impl ErrorCode + ?Sized)) -> Self {
        let code = RpcCode::parse(err.error_code());
        if code == RpcCode::InternalServerError {
            tracing::error!(error = %err, "procedure failed");
            return Self::internal();
        }
        Self::new(code, err.to_string())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "httpStatus": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Successful procedure result.
#[derive(Debug)]
pub struct RpcOk<T>(pub T);

impl<T: Serialize> IntoResponse for RpcOk<T> {
    fn into_response(self) -> Response {
        Json(json!({ "result": { "data": self.0 } })).into_response()
    }
}

pub type RpcResult<T> = Result<RpcOk<T>, RpcError>;

#[cfg(test)]
#[path = "rpc_test.rs"]
mod tests;
