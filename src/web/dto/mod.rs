//! Request and response DTOs for the HTTP API.

mod request;
mod response;

pub use request::*;
pub use response::*;
