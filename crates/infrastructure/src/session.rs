//! Signed session token codec
//!
//! Sessions are stateless: the payload travels inside the cookie as a
//! base64 token of `[u32 LE payload length][JSON payload][HMAC-SHA-256
//! signature]`. The signing key is derived with PBKDF2 from the configured
//! secret, falling back to a development key derived from the environment
//! name when no secret is set.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use domain::entities::SessionData;
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::config::Environment;

type HmacSha256 = Hmac<Sha256>;

const SESSION_COOKIE_NAME: &str = "session_id";
const SESSION_DURATION_MS: i64 = 24 * 60 * 60 * 1000;
const SIGNATURE_LEN: usize = 32;
const PBKDF2_ITERATIONS: u32 = 100_000;
const PBKDF2_SALT: &[u8] = b"session-salt";
const DEFAULT_ROLE: &str = "client";

/// Session token errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Token is not valid base64 or the framing is malformed
    #[error("Invalid session format")]
    InvalidFormat,

    /// Signature does not match the payload
    #[error("Invalid session signature")]
    InvalidSignature,

    /// Payload is not a complete session structure
    #[error("Invalid session data structure")]
    InvalidPayload,

    /// Session expiry timestamp has passed
    #[error("Session expired")]
    Expired,
}

/// Encodes, signs, and verifies session tokens
#[derive(Clone)]
pub struct SessionManager {
    key: [u8; 32],
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Create a manager from the configured secret
    ///
    /// Without a configured secret the key material is derived from the
    /// environment name, which keeps development setups working but must
    /// not be relied on in production.
    #[must_use]
    pub fn new(secret: Option<&SecretString>, environment: Environment) -> Self {
        let material = secret.map_or_else(
            || {
                debug!("No session secret configured, deriving development key");
                format!("session-signing-key-{environment}")
            },
            |s| s.expose_secret().to_string(),
        );

        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(material.as_bytes(), PBKDF2_SALT, PBKDF2_ITERATIONS, &mut key);
        Self { key }
    }

    /// Create a signed token for a fresh 24-hour session
    pub fn create_session(
        &self,
        user_id: impl Into<String>,
        role: Option<String>,
    ) -> Result<String, SessionError> {
        let now = Utc::now().timestamp_millis();
        let session = SessionData::new(
            Some(user_id.into()),
            Some(role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
            now,
            SESSION_DURATION_MS,
        );
        self.encode(&session)
    }

    /// Encode and sign a session payload
    pub fn encode(&self, session: &SessionData) -> Result<String, SessionError> {
        let payload = serde_json::to_vec(session).map_err(|_| SessionError::InvalidPayload)?;
        let payload_len =
            u32::try_from(payload.len()).map_err(|_| SessionError::InvalidPayload)?;

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|_| SessionError::InvalidSignature)?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        let mut combined = Vec::with_capacity(4 + payload.len() + SIGNATURE_LEN);
        combined.extend_from_slice(&payload_len.to_le_bytes());
        combined.extend_from_slice(&payload);
        combined.extend_from_slice(&signature);

        Ok(BASE64.encode(combined))
    }

    /// Decode a token and verify its signature
    ///
    /// Does not check expiry; use [`Self::verify_at`] for that.
    pub fn decode(&self, token: &str) -> Result<SessionData, SessionError> {
        let combined = BASE64
            .decode(token)
            .map_err(|_| SessionError::InvalidFormat)?;

        if combined.len() < 4 {
            return Err(SessionError::InvalidFormat);
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&combined[..4]);
        let payload_len = u32::from_le_bytes(len_bytes) as usize;

        if payload_len > combined.len() - 4 {
            return Err(SessionError::InvalidFormat);
        }

        let payload = &combined[4..4 + payload_len];
        let signature = &combined[4 + payload_len..];

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|_| SessionError::InvalidSignature)?;
        mac.update(payload);
        mac.verify_slice(signature)
            .map_err(|_| SessionError::InvalidSignature)?;

        let session: SessionData =
            serde_json::from_slice(payload).map_err(|_| SessionError::InvalidPayload)?;

        if session.created_at == 0 || session.expires_at == 0 {
            return Err(SessionError::InvalidPayload);
        }

        Ok(session)
    }

    /// Decode, verify, and check expiry against the given instant
    pub fn verify_at(&self, token: &str, now_ms: i64) -> Result<SessionData, SessionError> {
        let session = self.decode(token)?;
        if session.is_expired(now_ms) {
            return Err(SessionError::Expired);
        }
        Ok(session)
    }

    /// Decode, verify, and check expiry against the current time
    pub fn verify(&self, token: &str) -> Result<SessionData, SessionError> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// `Set-Cookie` value carrying a session token
    #[must_use]
    pub fn session_cookie(token: &str) -> String {
        format!(
            "{SESSION_COOKIE_NAME}={token}; HttpOnly; Secure; SameSite=Strict; Max-Age={}; Path=/",
            SESSION_DURATION_MS / 1000
        )
    }

    /// `Set-Cookie` value that clears the session
    #[must_use]
    pub fn clear_cookie() -> String {
        format!("{SESSION_COOKIE_NAME}=; HttpOnly; Secure; SameSite=Strict; Max-Age=0; Path=/")
    }

    /// Extract the session token from a `Cookie` header value
    #[must_use]
    pub fn token_from_cookie_header(header: &str) -> Option<String> {
        header.split(';').find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == SESSION_COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
        })
    }
}
