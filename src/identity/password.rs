//! Argon2 password hashing. Stored hashes are PHC strings carrying their own salt
//! and parameters, so verification never needs anything besides the string itself.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

const SALT_LEN: usize = 16;

/// Well-formed hash with the default parameters that no password is expected to match.
/// Checked against when a login names an unknown user so that path costs a full verify.
const PLACEHOLDER_PHC: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dW5rbm93bi11c2VyLXNsdA$Ayd4+l2uXGJ9Bv5yrN7P2X+VwOGsCH5GLDYKnXWXEuk";

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("salt generation failed: {0}")]
    Salt(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash `password` with a fresh random salt. Two calls with the same input never
/// produce the same string.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| HashError::Salt(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| HashError::Salt(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HashError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check `password` against a stored PHC hash. A hash that does not parse counts as a mismatch.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Spend the same Argon2 work as a real verification, for a login with no stored hash.
/// Always a mismatch.
pub fn verify_placeholder(password: &str) -> bool {
    let _ = verify_password(password, PLACEHOLDER_PHC);
    false
}
