//! Persistence module
//!
//! Screening request storage: a pooled SQLite store for deployments and an
//! in-memory store for development and tests. Both implement the same port
//! and are covered by one shared contract test suite.

pub mod connection;
pub mod memory_store;
pub mod migrations;
pub mod screening_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use memory_store::InMemoryScreeningRequestStore;
pub use screening_store::SqliteScreeningRequestStore;
