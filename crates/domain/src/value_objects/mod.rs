//! Value objects for the Screenroom domain

mod email_address;
mod screening_request_id;

pub use email_address::EmailAddress;
pub use screening_request_id::ScreeningRequestId;
