//! Random passwords for seeded and reset accounts.

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Characters a generated password is drawn from.
const CHARSET: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()_+";

/// Length of a generated password.
pub const GENERATED_PASSWORD_LENGTH: usize = 16;

/// Draw a password of [`GENERATED_PASSWORD_LENGTH`] characters from the OS RNG.
pub fn generate_password() -> String {
    // Rejection sampling keeps the distribution uniform.
    let limit = u8::MAX - (u8::MAX % CHARSET.len() as u8);
    let mut out = String::with_capacity(GENERATED_PASSWORD_LENGTH);
    let mut buf = [0u8; 32];

    while out.len() < GENERATED_PASSWORD_LENGTH {
        OsRng.fill_bytes(&mut buf);
        for byte in buf {
            if byte >= limit {
                continue;
            }
            out.push(CHARSET[(byte as usize) % CHARSET.len()] as char);
            if out.len() == GENERATED_PASSWORD_LENGTH {
                break;
            }
        }
    }
    out
}
