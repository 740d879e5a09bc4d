//! Password hashing with Argon2 (PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use p2p_types::RepoError;

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, RepoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))
}

/// Hashes on the blocking pool; Argon2 is deliberately CPU-heavy.
pub async fn hash_password_blocking(password: String) -> Result<String, RepoError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| RepoError::Database(format!("Password hashing task failed: {e}")))?
}

/// Checks a candidate password against a stored PHC hash. Only tests need
/// this until there is a login flow.
#[cfg(test)]
pub(crate) fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
