//! Password hashing and policy enforcement.

pub mod generator;
pub mod hasher;
pub mod validator;

pub use generator::generate_password;
pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
