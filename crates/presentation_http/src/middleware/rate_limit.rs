//! Rate limiting middleware
//!
//! Fixed-window counter keyed by client identifier. The first request in a
//! window records a reset time; requests past the configured maximum are
//! rejected with 429 until the window rolls over.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;
use tower::{Layer, Service};
use tracing::warn;

/// Entries above this count trigger a sweep of expired windows
const SWEEP_THRESHOLD: usize = 1000;

/// Shared fallback bucket for clients with no identifying header
const UNKNOWN_CLIENT: &str = "unknown";

/// Time source, injectable for deterministic tests
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in epoch milliseconds
    fn now_ms(&self) -> i64;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Rate limiter configuration
#[derive(Clone, Debug)]
pub struct RateLimiterConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window length in milliseconds
    pub window_ms: i64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_ms: 60_000,
        }
    }
}

/// Counter for a single client within the current window
#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    reset_at_ms: i64,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
enum Decision {
    Allowed,
    Denied { retry_after_secs: i64, reset_at_ms: i64 },
}

/// Shared rate limiter state
#[derive(Debug)]
pub struct RateLimiterState {
    entries: RwLock<HashMap<String, RateLimitEntry>>,
    max_requests: u32,
    window_ms: i64,
    clock: Arc<dyn Clock>,
}

impl RateLimiterState {
    /// Create new state with the wall clock
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create new state with an explicit time source
    #[must_use]
    pub fn with_clock(config: &RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_requests: config.max_requests,
            window_ms: config.window_ms,
            clock,
        }
    }

    /// Record a request for the given client and decide whether to allow it
    #[allow(clippy::significant_drop_tightening)]
    async fn check(&self, client: &str) -> Decision {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;

        // Bound the map; entries whose window is long gone are dropped
        if entries.len() > SWEEP_THRESHOLD {
            let cutoff = now - self.window_ms;
            entries.retain(|_, entry| entry.reset_at_ms >= cutoff);
        }

        match entries.get_mut(client) {
            Some(entry) if entry.reset_at_ms >= now => {
                entry.count += 1;
                if entry.count > self.max_requests {
                    let reset_at_ms = entry.reset_at_ms;
                    let retry_after_secs = div_ceil_i64(reset_at_ms - now, 1000);
                    Decision::Denied {
                        retry_after_secs,
                        reset_at_ms,
                    }
                } else {
                    Decision::Allowed
                }
            },
            _ => {
                entries.insert(
                    client.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_at_ms: now + self.window_ms,
                    },
                );
                Decision::Allowed
            },
        }
    }

    /// Number of clients currently tracked
    pub async fn tracked_clients(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Layer that applies rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    state: Arc<RateLimiterState>,
    enabled: bool,
    max_requests: u32,
    excluded_paths: Vec<String>,
}

impl RateLimiterLayer {
    /// Create a new rate limiter layer
    #[must_use]
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self::with_state(config, Arc::new(RateLimiterState::new(config)))
    }

    /// Create a layer around existing state
    #[must_use]
    pub fn with_state(config: &RateLimiterConfig, state: Arc<RateLimiterState>) -> Self {
        Self {
            state,
            enabled: config.enabled,
            max_requests: config.max_requests,
            excluded_paths: vec!["/health".to_string(), "/api/health".to_string()],
        }
    }

    /// Add paths that should be excluded from rate limiting
    #[must_use]
    pub fn exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths.extend(paths);
        self
    }

    /// Get a reference to the rate limiter state
    #[must_use]
    pub fn state(&self) -> Arc<RateLimiterState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: Arc::clone(&self.state),
            enabled: self.enabled,
            max_requests: self.max_requests,
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Middleware service for rate limiting
#[derive(Clone, Debug)]
pub struct RateLimiter<S> {
    inner: S,
    state: Arc<RateLimiterState>,
    enabled: bool,
    max_requests: u32,
    excluded_paths: Vec<String>,
}

impl<S> Service<Request> for RateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let enabled = self.enabled;
        let state = Arc::clone(&self.state);
        let max_requests = self.max_requests;
        let excluded_paths = self.excluded_paths.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !enabled {
                return inner.call(req).await;
            }

            let path = req.uri().path();
            if excluded_paths.iter().any(|p| path.starts_with(p)) {
                return inner.call(req).await;
            }

            let client = identify_client(&req);

            match state.check(&client).await {
                Decision::Allowed => inner.call(req).await,
                Decision::Denied {
                    retry_after_secs,
                    reset_at_ms,
                } => {
                    warn!(client = %client, path = %req.uri().path(), "Rate limit exceeded");
                    Ok(too_many_requests(
                        max_requests,
                        retry_after_secs,
                        reset_at_ms,
                    ))
                },
            }
        })
    }
}

/// Pick the client key from proxy headers, falling back to a shared bucket
fn identify_client(req: &Request) -> String {
    for header in ["cf-connecting-ip", "x-forwarded-for", "x-real-ip"] {
        if let Some(value) = req.headers().get(header).and_then(|v| v.to_str().ok()) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    UNKNOWN_CLIENT.to_string()
}

/// Ceiling division for `i64`; `i64::div_ceil` is unstable (`int_roundings`)
fn div_ceil_i64(lhs: i64, rhs: i64) -> i64 {
    let d = lhs / rhs;
    let r = lhs % rhs;
    if (r > 0 && rhs > 0) || (r < 0 && rhs < 0) {
        d + 1
    } else {
        d
    }
}

/// Build the 429 response with retry metadata headers
fn too_many_requests(max_requests: u32, retry_after_secs: i64, reset_at_ms: i64) -> Response {
    let body = json!({
        "message": "Too many requests",
        "retryAfter": retry_after_secs,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        headers.insert(RETRY_AFTER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&max_requests.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    if let Ok(value) = HeaderValue::from_str(&div_ceil_i64(reset_at_ms, 1000).to_string()) {
        headers.insert("x-ratelimit-reset", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, routing::get};
    use std::sync::atomic::{AtomicI64, Ordering};
    use tower::ServiceExt;

    use super::*;

    /// Manually advanced clock for window tests
    #[derive(Debug, Default)]
    struct TestClock {
        now_ms: AtomicI64,
    }

    impl TestClock {
        fn advance(&self, ms: i64) {
            self.now_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now_ms(&self) -> i64 {
            self.now_ms.load(Ordering::SeqCst)
        }
    }

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn request(path: &str, client: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(path);
        if let Some(ip) = client {
            builder = builder.header("x-forwarded-for", ip);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn app_with_clock(config: &RateLimiterConfig, clock: Arc<dyn Clock>) -> Router {
        let state = Arc::new(RateLimiterState::with_clock(config, clock));
        Router::new()
            .route("/api/data", get(test_handler))
            .route("/api/health", get(test_handler))
            .layer(RateLimiterLayer::with_state(config, state))
    }

    #[tokio::test]
    async fn requests_within_limit_succeed() {
        let config = RateLimiterConfig {
            max_requests: 5,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(request("/api/data", Some("10.0.0.1")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn request_over_limit_is_rejected_with_headers() {
        let config = RateLimiterConfig {
            max_requests: 2,
            window_ms: 60_000,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request("/api/data", Some("10.0.0.1")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let headers = response.headers();
        assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "2");
        assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "0");
        assert!(headers.contains_key("x-ratelimit-reset"));

        let retry_after: i64 = headers
            .get("retry-after")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(retry_after > 0 && retry_after <= 60);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Too many requests");
        assert_eq!(json["retryAfter"], retry_after);
    }

    #[tokio::test]
    async fn counter_resets_after_window_elapses() {
        let clock = Arc::new(TestClock::default());
        let config = RateLimiterConfig {
            max_requests: 1,
            window_ms: 60_000,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::clone(&clock) as Arc<dyn Clock>);

        let ok = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.1")))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let limited = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.1")))
            .await
            .unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

        clock.advance(60_001);

        let after_window = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.1")))
            .await
            .unwrap();
        assert_eq!(after_window.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn clients_are_limited_independently() {
        let config = RateLimiterConfig {
            max_requests: 1,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        let first = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let other_client = app
            .clone()
            .oneshot(request("/api/data", Some("10.0.0.2")))
            .await
            .unwrap();
        assert_eq!(other_client.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_headers_share_the_unknown_bucket() {
        let config = RateLimiterConfig {
            max_requests: 1,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        let first = app
            .clone()
            .oneshot(request("/api/data", None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .clone()
            .oneshot(request("/api/data", None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn health_endpoint_bypasses_the_limiter() {
        let config = RateLimiterConfig {
            max_requests: 1,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(request("/api/health", Some("10.0.0.1")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn disabled_limiter_passes_everything() {
        let config = RateLimiterConfig {
            enabled: false,
            max_requests: 1,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(request("/api/data", Some("10.0.0.1")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn cf_connecting_ip_takes_precedence() {
        let config = RateLimiterConfig {
            max_requests: 1,
            ..RateLimiterConfig::default()
        };
        let app = app_with_clock(&config, Arc::new(TestClock::default()));

        let req = Request::builder()
            .uri("/api/data")
            .header("cf-connecting-ip", "1.1.1.1")
            .header("x-forwarded-for", "2.2.2.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);

        // Same CF ip, different forwarded ip: still the same bucket
        let req = Request::builder()
            .uri("/api/data")
            .header("cf-connecting-ip", "1.1.1.1")
            .header("x-forwarded-for", "3.3.3.3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(req).await.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn sweep_drops_long_expired_entries() {
        let clock = Arc::new(TestClock::default());
        let config = RateLimiterConfig {
            max_requests: 5,
            window_ms: 1_000,
            ..RateLimiterConfig::default()
        };
        let state = Arc::new(RateLimiterState::with_clock(
            &config,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));

        for i in 0..=SWEEP_THRESHOLD {
            state.check(&format!("client-{i}")).await;
        }
        assert!(state.tracked_clients().await > SWEEP_THRESHOLD);

        // Move past every window plus the sweep grace period
        clock.advance(10_000);
        state.check("fresh-client").await;
        assert_eq!(state.tracked_clients().await, 1);
    }
}
