//! Request and response bodies.

pub mod query;
pub mod request;
pub mod response;
