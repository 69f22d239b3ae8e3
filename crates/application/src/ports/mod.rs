//! Port definitions for infrastructure adapters

mod screening_store;

pub use screening_store::ScreeningRequestStore;
