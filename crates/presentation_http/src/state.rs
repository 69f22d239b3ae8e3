//! Application state shared across handlers

use std::sync::Arc;

use application::ScreeningRequestService;
use infrastructure::{Environment, SessionManager};

use crate::assets::StaticAssets;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Screening request use cases
    pub screening_service: ScreeningRequestService,
    /// Session token codec
    pub sessions: Arc<SessionManager>,
    /// Static asset resolver
    pub assets: Arc<StaticAssets>,
    /// Application environment
    pub environment: Environment,
}
