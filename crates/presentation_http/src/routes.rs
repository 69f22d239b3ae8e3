//! Route definitions
//!
//! Assembles the edge dispatcher: health endpoints, the rate-limited and
//! CORS-wrapped API sub-router, and the static asset fallback. Security
//! headers and request logging wrap every route.

use std::time::Duration;

use axum::{
    Router,
    http::{Method, header},
    routing::{any, get},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    handlers::{assets, health, screening_requests},
    middleware::{RateLimiterLayer, RequestLogLayer, SecurityHeadersLayer},
    state::AppState,
};

/// CORS policy for the JSON API
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86_400))
}

/// Create the application router
///
/// The rate limiter sits inside CORS so rejected requests still carry the
/// CORS headers; health endpoints bypass the limiter entirely.
pub fn create_router(state: AppState, rate_limiter: RateLimiterLayer) -> Router {
    let api = Router::new()
        .route("/api/health", get(health::health_check))
        .route(
            "/api/screening-requests",
            get(screening_requests::list).post(screening_requests::create),
        )
        .route(
            "/api/screening-requests/{id}",
            get(screening_requests::get_by_id),
        )
        .route("/api/{*rest}", any(screening_requests::api_not_found))
        .layer(rate_limiter)
        .layer(cors());

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .fallback(assets::serve_asset)
        .layer(SecurityHeadersLayer::new())
        .layer(RequestLogLayer::new())
        .with_state(state)
}
