//! Screenroom HTTP presentation layer
//!
//! Edge dispatch for the promotional site: the screening request API,
//! static asset and SPA serving, and the cross-cutting middleware stack.

pub mod assets;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use assets::StaticAssets;
pub use error::ApiError;
pub use middleware::{
    RateLimiterConfig, RateLimiterLayer, RequestLogLayer, SecurityHeadersLayer, ValidatedJson,
};
pub use routes::create_router;
pub use state::AppState;
