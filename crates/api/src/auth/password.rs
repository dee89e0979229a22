//! Secret hashing and the password policy.
//!
//! Passwords and security answers are both stored as Argon2id PHC strings,
//! so the salt and cost parameters travel with each hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 16;

pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be between 8-16 characters and include \
     an uppercase letter, lowercase letter, number, and special character.";

/// Hash a secret with a fresh salt.
pub fn hash_password(secret: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `Ok(false)` on a mismatch; `Err` only when `stored` is not a valid hash.
pub fn verify_password(secret: &str, stored: &str) -> Result<bool, HashError> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(secret.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// 8-16 characters with at least one uppercase letter, lowercase letter,
/// digit and special character. The error is the user-facing message.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    let has = |pred: fn(&char) -> bool| password.chars().any(|c| pred(&c));

    let ok = (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length)
        && has(char::is_ascii_uppercase)
        && has(char::is_ascii_lowercase)
        && has(char::is_ascii_digit)
        && has(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if ok {
        Ok(())
    } else {
        Err(PASSWORD_POLICY_MESSAGE.to_string())
    }
}
