//! Password hashing using Argon2id.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::error;

/// Minimum plaintext length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password into a PHC string with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails or the blocking task is cancelled.
pub async fn hash(plaintext: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&plaintext))
        .await
        .context("password hashing task failed")?
}

/// Compare a plaintext password against a stored PHC string.
///
/// A malformed digest never errors; it simply does not match.
pub async fn verify(plaintext: String, digest: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_blocking(&plaintext, &digest)).await {
        Ok(matches) => matches,
        Err(err) => {
            error!("password verification task failed: {err}");
            false
        }
    }
}

fn hash_blocking(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

fn verify_blocking(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
