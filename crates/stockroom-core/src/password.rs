//! # Password Digests
//!
//! Salted Argon2id hashing for operator credentials.
//!
//! ```text
//! signup:  plaintext ──► hash_password ──► "$argon2id$v=19$m=...$salt$hash" ──► users.password_hash
//! login:   plaintext ──► verify_password(plaintext, stored PHC string) ──► bool
//! ```
//!
//! Every digest carries its own random salt and parameters (PHC string
//! format), so two digests of the same password differ byte-for-byte but
//! both verify.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::{CoreError, CoreResult};

/// Hash a password for storage.
pub fn hash_password(plaintext: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored digest.
///
/// A digest that cannot be parsed verifies as `false`.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let parsed_hash = match PasswordHash::new(digest) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}
