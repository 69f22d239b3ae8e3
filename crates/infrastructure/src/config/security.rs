//! Security configuration: rate limiting and session signing.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Security configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Enable API rate limiting
    #[serde(default = "default_true")]
    pub rate_limit_enabled: bool,

    /// Maximum requests allowed per client within one window
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    /// Rate limit window length in milliseconds
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: i64,

    /// Session token signing secret (sensitive - uses SecretString)
    ///
    /// When unset, a development key derived from the environment name is
    /// used. Set this in production.
    #[serde(default, skip_serializing)]
    pub session_secret: Option<SecretString>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_ms", &self.rate_limit_window_ms)
            .field(
                "session_secret",
                &if self.session_secret.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .finish()
    }
}

const fn default_rate_limit_max_requests() -> u32 {
    100
}

const fn default_rate_limit_window_ms() -> i64 {
    60_000
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_enabled: true,
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_ms: default_rate_limit_window_ms(),
            session_secret: None,
        }
    }
}
