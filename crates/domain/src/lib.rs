//! Domain layer for Screenroom
//!
//! Contains the core business types for the promotional site: screening
//! requests, sessions, value objects, and domain errors. This layer has no
//! I/O dependencies and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
