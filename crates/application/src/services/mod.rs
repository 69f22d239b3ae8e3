//! Application services - Use case implementations

mod screening_service;

pub use screening_service::ScreeningRequestService;
