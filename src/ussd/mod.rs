//! USSD gateway protocol handling

pub mod router;

pub use router::{UssdRequest, UssdResponse, UssdRouter};
