//! Session authentication guard
//!
//! Verifies the signed session cookie on requests that need an
//! authenticated caller.

use axum::http::{HeaderMap, header};
use domain::entities::SessionData;
use infrastructure::SessionManager;

use crate::error::ApiError;

/// Extract and verify the session cookie
///
/// Returns the session payload, or a 401 error: `Authentication required`
/// when no cookie is present, `Invalid or expired session` when the token
/// fails verification.
pub fn require_auth(sessions: &SessionManager, headers: &HeaderMap) -> Result<SessionData, ApiError> {
    let token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(SessionManager::token_from_cookie_header);

    let Some(token) = token else {
        return Err(ApiError::Unauthorized("Authentication required".to_string()));
    };

    sessions
        .verify(&token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use infrastructure::Environment;

    fn manager() -> SessionManager {
        SessionManager::new(None, Environment::Development)
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn missing_cookie_requires_authentication() {
        let result = require_auth(&manager(), &HeaderMap::new());
        let Err(ApiError::Unauthorized(msg)) = result else {
            unreachable!("Expected Unauthorized");
        };
        assert_eq!(msg, "Authentication required");
    }

    #[test]
    fn tampered_token_is_invalid() {
        let result = require_auth(&manager(), &headers_with_cookie("session_id=AAAA"));
        let Err(ApiError::Unauthorized(msg)) = result else {
            unreachable!("Expected Unauthorized");
        };
        assert_eq!(msg, "Invalid or expired session");
    }

    #[test]
    fn valid_cookie_yields_session() {
        let sessions = manager();
        let token = sessions.create_session("editor", None).unwrap();
        let headers = headers_with_cookie(&format!("session_id={token}"));
        let session = require_auth(&sessions, &headers).unwrap();
        assert_eq!(session.user_id.as_deref(), Some("editor"));
        assert_eq!(session.role.as_deref(), Some("client"));
    }

    #[test]
    fn unrelated_cookies_are_ignored() {
        let result = require_auth(&manager(), &headers_with_cookie("theme=dark; lang=en"));
        let Err(ApiError::Unauthorized(msg)) = result else {
            unreachable!("Expected Unauthorized");
        };
        assert_eq!(msg, "Authentication required");
    }
}
