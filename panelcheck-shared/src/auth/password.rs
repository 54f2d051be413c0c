/// Password hashing and registration password rules
///
/// Passwords are hashed with Argon2id and a per-password random salt. The
/// PHC string produced by [`hash_password`] embeds the algorithm, parameters
/// and salt, so [`verify_password`] needs nothing but the stored string.
///
/// # Parameters
///
/// - Memory: 19 MiB (19456 KiB)
/// - Iterations: 2
/// - Parallelism: 1
///
/// # Example
///
/// ```
/// use panelcheck_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("breaker-box-42")?;
/// assert!(verify_password("breaker-box-42", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

const M_COST_KIB: u32 = 19_456;
const T_COST: u32 = 2;
const P_COST: u32 = 1;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// A registration password that breaks a rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordRuleError {
    #[error("Password must be at least 8 characters")]
    TooShort,

    #[error("Passwords do not match")]
    Mismatch,
}

impl PasswordRuleError {
    /// Request field the error should be reported against
    pub fn field(&self) -> &'static str {
        match self {
            PasswordRuleError::TooShort => "password",
            PasswordRuleError::Mismatch => "confirmPassword",
        }
    }
}

fn argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(M_COST_KIB, T_COST, P_COST, None)
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash in constant time
///
/// Returns `Ok(false)` for a wrong password and `Err` only when the stored
/// hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Checks a new password and its confirmation
///
/// Length is counted in characters, not bytes.
///
/// # Example
///
/// ```
/// use panelcheck_shared::auth::password::{validate_new_password, PasswordRuleError};
///
/// assert!(validate_new_password("longenough", "longenough").is_ok());
/// assert_eq!(validate_new_password("short", "short"), Err(PasswordRuleError::TooShort));
/// assert_eq!(validate_new_password("longenough", "different"), Err(PasswordRuleError::Mismatch));
/// ```
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), PasswordRuleError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRuleError::TooShort);
    }

    if password != confirm {
        return Err(PasswordRuleError::Mismatch);
    }

    Ok(())
}
