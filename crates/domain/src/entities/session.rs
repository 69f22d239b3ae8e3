//! Session payload entity

use serde::{Deserialize, Serialize};

/// Payload carried inside a signed session token
///
/// Timestamps are epoch milliseconds. The payload is never stored server
/// side; it travels in a tamper-evident cookie and is trusted only after
/// its signature verifies and `expires_at` is still in the future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
}

impl SessionData {
    /// Create a session valid from `now_ms` for `ttl_ms` milliseconds
    pub fn new(user_id: Option<String>, role: Option<String>, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            user_id,
            role,
            created_at: now_ms,
            expires_at: now_ms + ttl_ms,
        }
    }

    /// Whether the session has expired as of `now_ms`
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}
