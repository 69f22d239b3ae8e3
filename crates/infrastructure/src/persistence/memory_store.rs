//! In-memory screening request store
//!
//! Keeps records in a vector guarded by an async lock. Used in development
//! and tests; contents are lost on restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use application::{error::ApplicationError, ports::ScreeningRequestStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::{
    entities::{NewScreeningRequest, ScreeningRequest},
    value_objects::ScreeningRequestId,
};
use tokio::sync::RwLock;

/// In-memory screening request store
#[derive(Debug, Clone, Default)]
pub struct InMemoryScreeningRequestStore {
    records: Arc<RwLock<Vec<ScreeningRequest>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryScreeningRequestStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl ScreeningRequestStore for InMemoryScreeningRequestStore {
    async fn get(
        &self,
        id: ScreeningRequestId,
    ) -> Result<Option<ScreeningRequest>, ApplicationError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ScreeningRequest>, ApplicationError> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn create(
        &self,
        request: NewScreeningRequest,
    ) -> Result<ScreeningRequest, ApplicationError> {
        let id = ScreeningRequestId::new(self.next_id.fetch_add(1, Ordering::SeqCst))?;
        let stored = ScreeningRequest {
            id,
            name: request.name,
            email: request.email,
            organization: request.organization,
            screening_type: request.screening_type,
            event_date: request.event_date,
            attendee_count: request.attendee_count,
            message: request.message,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().await;
        records.push(stored.clone());
        Ok(stored)
    }
}
