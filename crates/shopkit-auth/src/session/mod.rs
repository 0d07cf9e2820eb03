//! Session lifecycle: issue, rotation, lookup, destruction and sweeping.

pub mod cleanup;
pub mod manager;
pub mod token;

pub use cleanup::SessionSweeper;
pub use manager::{IssuedSession, SessionManager};
pub use token::{generate_token, hash_token};
