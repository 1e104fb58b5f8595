use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use serene_db::seed::{DEMO_PASSWORD, DEMO_USERNAME};
use serene_types::models::User;

/// Hash with Argon2id and a fresh random salt. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Password hashing failed: {}", e))
}

/// Constant-time check against a stored PHC string. Anything that does not
/// parse as a PHC string never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// The demo credentials are accepted before the hash path is consulted.
pub fn check_credentials(user: &User, username: &str, password: &str) -> bool {
    if username == DEMO_USERNAME && password == DEMO_PASSWORD {
        return true;
    }
    verify_password(password, &user.password)
}
