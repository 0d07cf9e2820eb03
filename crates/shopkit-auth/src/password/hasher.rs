//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying the parameters and
//! a random salt, so stored hashes stay verifiable if the defaults change.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;

/// Argon2id with the library's default parameters.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

fn hashing_error(context: &str, e: HashError) -> AppError {
    AppError::new(ErrorKind::Internal, format!("{context}: {e}"))
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| hashing_error("password hashing failed", e))
    }

    /// `Ok(false)` on mismatch. A malformed stored hash is an internal error.
    pub fn verify_password(&self, password: &str, phc: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(phc)
            .map_err(|e| hashing_error("stored password hash is invalid", e))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(hashing_error("password verification failed", e)),
        }
    }

    /// Spend the time of one hash when there is no stored hash to check,
    /// so unknown accounts answer as slowly as known ones.
    pub fn burn(&self, password: &str) {
        let _ = self.hash_password(password);
    }
}
