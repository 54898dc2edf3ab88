//! bcrypt hashing for stored user credentials.

use crate::error::AppError;

/// Lowest work factor bcrypt accepts; keeps hashing fast in tests.
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

/// Hashes `plain` with the configured work factor (`BCRYPT_COST`).
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// Checks `plain` against a stored hash. A malformed stored hash is a server
/// error, not a failed login.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(plain, stored_hash)?)
}
