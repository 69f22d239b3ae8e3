//! Domain entities

mod screening_request;
mod session;

pub use screening_request::{NewScreeningRequest, ScreeningRequest};
pub use session::SessionData;
