//! HTTP middleware components
//!
//! Cross-cutting layers: rate limiting, security headers, request logging,
//! session authentication, and request body validation.

pub mod rate_limit;
pub mod request_log;
pub mod security_headers;
pub mod session;
pub mod validation;

pub use rate_limit::{
    Clock, RateLimiter, RateLimiterConfig, RateLimiterLayer, RateLimiterState, SystemClock,
};
pub use request_log::{RequestLog, RequestLogLayer};
pub use security_headers::{SecurityHeaders, SecurityHeadersLayer};
pub use session::require_auth;
pub use validation::ValidatedJson;
