//! Account lifecycle: registration, login, logout, password and session management.

pub mod input;
pub mod service;

pub use input::RegisterInput;
pub use service::{AccountService, AuthOutcome, MeView};
