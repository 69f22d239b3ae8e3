//! Screening request storage port
//!
//! Defines the interface for persisting and retrieving screening requests.

use async_trait::async_trait;
use domain::{
    entities::{NewScreeningRequest, ScreeningRequest},
    value_objects::ScreeningRequestId,
};

use crate::error::ApplicationError;

/// Port for screening request persistence
#[async_trait]
pub trait ScreeningRequestStore: Send + Sync {
    /// Get a screening request by id
    async fn get(
        &self,
        id: ScreeningRequestId,
    ) -> Result<Option<ScreeningRequest>, ApplicationError>;

    /// List all screening requests, oldest first
    async fn list(&self) -> Result<Vec<ScreeningRequest>, ApplicationError>;

    /// Persist a new screening request and return the stored record
    async fn create(
        &self,
        request: NewScreeningRequest,
    ) -> Result<ScreeningRequest, ApplicationError>;
}
