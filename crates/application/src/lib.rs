//! Application layer - Use cases and orchestration
//!
//! Defines the storage port and the screening request service that sits
//! between the HTTP surface and the persistence adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
