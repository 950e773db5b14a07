//! Salted, iterated SHA-256 password hashing.
//!
//! Encoded form: `sha256$<iterations>$<salt hex>$<digest hex>`. The iteration
//! count travels with the hash so it can be raised without invalidating
//! stored passwords.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::DatabaseError;

const SCHEME: &str = "sha256";
const ITERATIONS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// Fill a buffer of `len` bytes from the OS RNG.
pub(crate) fn random_bytes(len: usize) -> Result<Vec<u8>, DatabaseError> {
    let mut buf = vec![0u8; len];
    getrandom::fill(&mut buf)
        .map_err(|e| DatabaseError::Other(anyhow::anyhow!("OS randomness unavailable: {e}")))?;
    Ok(buf)
}

fn digest(password: &str, salt: &str, iterations: u32) -> String {
    let mut hash = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..iterations {
        hash = Sha256::new()
            .chain_update(hash)
            .chain_update(password.as_bytes())
            .finalize();
    }
    hex::encode(hash)
}

/// Hash `password` with a fresh random salt.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if the OS random source fails.
pub fn hash_password(password: &str) -> Result<String, DatabaseError> {
    let salt = hex::encode(random_bytes(SALT_LEN)?);
    let hash = digest(password, &salt, ITERATIONS);
    Ok(format!("{SCHEME}${ITERATIONS}${salt}${hash}"))
}

/// Check `password` against an encoded hash. Malformed hashes never match.
#[must_use]
pub fn check_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(SCHEME), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }

    let actual = digest(password, salt, iterations);
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}

fn join_error(error: tokio::task::JoinError) -> DatabaseError {
    DatabaseError::Other(anyhow::anyhow!("password hashing task failed: {error}"))
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub(crate) async fn hash_password_async(password: &str) -> Result<String, DatabaseError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_error)?
}

/// [`check_password`] on the blocking pool, off the async workers.
pub(crate) async fn check_password_async(
    password: &str,
    encoded: String,
) -> Result<bool, DatabaseError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || check_password(&password, &encoded))
        .await
        .map_err(join_error)
}
