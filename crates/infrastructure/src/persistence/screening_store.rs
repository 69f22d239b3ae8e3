//! SQLite screening request store
//!
//! Implements the `ScreeningRequestStore` port using SQLite. Calls run on
//! the blocking thread pool because rusqlite is synchronous.

use std::sync::Arc;

use application::{error::ApplicationError, ports::ScreeningRequestStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    entities::{NewScreeningRequest, ScreeningRequest},
    value_objects::{EmailAddress, ScreeningRequestId},
};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based screening request store
#[derive(Debug, Clone)]
pub struct SqliteScreeningRequestStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteScreeningRequestStore {
    /// Create a new SQLite screening request store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScreeningRequestStore for SqliteScreeningRequestStore {
    #[instrument(skip(self), fields(id = %id))]
    async fn get(
        &self,
        id: ScreeningRequestId,
    ) -> Result<Option<ScreeningRequest>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                "SELECT id, name, email, organization, screening_type,
                        event_date, attendee_count, message, created_at
                 FROM screening_requests WHERE id = ?1",
                [id.value()],
                row_to_request,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ScreeningRequest>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(
                    "SELECT id, name, email, organization, screening_type,
                            event_date, attendee_count, message, created_at
                     FROM screening_requests ORDER BY created_at ASC, id ASC",
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let requests = stmt
                .query_map([], row_to_request)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            Ok(requests)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, request))]
    async fn create(
        &self,
        request: NewScreeningRequest,
    ) -> Result<ScreeningRequest, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO screening_requests
                     (name, email, organization, screening_type,
                      event_date, attendee_count, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    request.name,
                    request.email.as_str(),
                    request.organization,
                    request.screening_type,
                    request.event_date,
                    request.attendee_count,
                    request.message,
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let id = ScreeningRequestId::new(conn.last_insert_rowid())?;
            debug!(id = %id, "Stored screening request");

            Ok(ScreeningRequest {
                id,
                name: request.name,
                email: request.email,
                organization: request.organization,
                screening_type: request.screening_type,
                event_date: request.event_date,
                attendee_count: request.attendee_count,
                message: request.message,
                created_at,
            })
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Map a database row to a screening request
fn row_to_request(row: &Row<'_>) -> Result<ScreeningRequest, rusqlite::Error> {
    let id = ScreeningRequestId::new(row.get(0)?).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    let email_raw: String = row.get(2)?;
    let email = EmailAddress::new(email_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at_raw: String = row.get(8)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(ScreeningRequest {
        id,
        name: row.get(1)?,
        email,
        organization: row.get(3)?,
        screening_type: row.get(4)?,
        event_date: row.get(5)?,
        attendee_count: row.get(6)?,
        message: row.get(7)?,
        created_at,
    })
}
