//! Screening request use cases

use std::sync::Arc;

use domain::{
    entities::{NewScreeningRequest, ScreeningRequest},
    value_objects::ScreeningRequestId,
};
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::ScreeningRequestStore;

/// Service coordinating screening request intake and lookup
#[derive(Clone)]
pub struct ScreeningRequestService {
    store: Arc<dyn ScreeningRequestStore>,
}

impl std::fmt::Debug for ScreeningRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreeningRequestService").finish()
    }
}

impl ScreeningRequestService {
    pub fn new(store: Arc<dyn ScreeningRequestStore>) -> Self {
        Self { store }
    }

    /// Fetch a single screening request
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        id: ScreeningRequestId,
    ) -> Result<Option<ScreeningRequest>, ApplicationError> {
        self.store.get(id).await
    }

    /// List all screening requests, oldest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ScreeningRequest>, ApplicationError> {
        self.store.list().await
    }

    /// Persist a new submission
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        request: NewScreeningRequest,
    ) -> Result<ScreeningRequest, ApplicationError> {
        let stored = self.store.create(request).await?;
        info!(id = %stored.id, "Screening request created");
        Ok(stored)
    }
}
