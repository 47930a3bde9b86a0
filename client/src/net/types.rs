//! Wire types shared with the auth server.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public account record. The server never sends the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339.
    pub updated_at: String,
}

impl User {
    /// Name to show in headers and menus; falls back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.email)
    }
}

/// Result of `auth.login` and `auth.register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// Result of `auth.me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MePayload {
    pub user: User,
}

/// Result of `auth.logout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LogoutPayload {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterInput<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}
