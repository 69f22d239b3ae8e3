//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite and in-memory
//! storage for screening requests, configuration loading, and the signed
//! session token codec.

pub mod config;
pub mod persistence;
pub mod session;

pub use config::{
    AppConfig, AssetConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig,
    StorageBackend,
};
pub use persistence::{
    ConnectionPool, InMemoryScreeningRequestStore, SqliteScreeningRequestStore, create_pool,
};
pub use session::{SessionError, SessionManager};
