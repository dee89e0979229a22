//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing, verification and the password policy.
//! - [`jwt`] -- Bearer token generation and validation.
//! - [`recovery`] -- Account recovery challenge (security questions).

pub mod jwt;
pub mod password;
pub mod recovery;
