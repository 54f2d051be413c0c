/// Registration and credential checks
///
/// [`AuthGate`] is the only place that touches passwords. Handlers hand it
/// raw credentials and get back a [`User`] or an [`AuthError`]; keeping the
/// user logged in afterwards is up to the caller.
///
/// # Security Properties
///
/// - Passwords are stored only as Argon2id hashes
/// - Login on an unknown email still runs a full hash verification against a
///   dummy hash, and both failure modes share one error
///
/// # Example
///
/// ```
/// use panelcheck_shared::auth::gate::{AuthGate, RegisterUser};
/// use panelcheck_shared::store::memory::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = AuthGate::new(Arc::new(MemoryStore::new()));
///
/// let user = gate
///     .register(RegisterUser {
///         email: "Sparky@Example.com".to_string(),
///         password: "breaker-box-42".to_string(),
///         confirm_password: "breaker-box-42".to_string(),
///     })
///     .await?;
/// assert_eq!(user.email, "sparky@example.com");
///
/// let same = gate.login("sparky@example.com", "breaker-box-42").await?;
/// assert_eq!(same.id, user.id);
/// # Ok(())
/// # }
/// ```

use crate::auth::password::{hash_password, validate_new_password, verify_password, PasswordError};
use crate::models::user::{normalize_email, CreateUser, User};
use crate::store::{RecordStore, StoreError};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Shared message for every failed login
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration input broke a rule
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Email is already registered
    #[error("Email already registered")]
    Conflict,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AuthError::Conflict,
            other => AuthError::Store(other),
        }
    }
}

/// Registration request
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Credential checks over a record store
#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn RecordStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Creates an account
    ///
    /// # Errors
    ///
    /// - `Validation` for a short or unconfirmed password
    /// - `Conflict` if the email exists in any letter case
    pub async fn register(&self, input: RegisterUser) -> Result<User, AuthError> {
        validate_new_password(&input.password, &input.confirm_password).map_err(|e| {
            AuthError::Validation {
                field: e.field(),
                message: e.to_string(),
            }
        })?;

        let email = normalize_email(&input.email);
        if self.store.get_user_by_email(&email).await?.is_some() {
            debug!(email = %email, "Registration rejected, email taken");
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(&input.password)?;

        // The store's unique index still catches a concurrent registration
        let user = self
            .store
            .create_user(CreateUser {
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an unknown email or a wrong password
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.get_user_by_email(&email).await? else {
            if let Some(dummy) = dummy_hash() {
                let _ = verify_password(password, dummy);
            }
            debug!("Login failed, unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            debug!(user_id = user.id, "Login failed, wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Looks up the user a session points at
    ///
    /// `None` when the account no longer exists.
    pub async fn current_user(&self, user_id: i64) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(user_id).await?)
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();

    DUMMY
        .get_or_init(|| hash_password("panelcheck-dummy-password").ok())
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn gate() -> AuthGate {
        AuthGate::new(Arc::new(MemoryStore::new()))
    }

    fn registration(email: &str, password: &str, confirm: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let err = gate()
            .register(registration("a@b.com", "short", "short"))
            .await
            .unwrap_err();

        match err {
            AuthError::Validation { field, message } => {
                assert_eq!(field, "password");
                assert_eq!(message, "Password must be at least 8 characters");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_mismatch() {
        let err = gate()
            .register(registration("a@b.com", "longenough", "different1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Validation {
                field: "confirmPassword",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_register_conflict_is_case_insensitive() {
        let gate = gate();
        gate.register(registration("Sparky@Example.com", "longenough", "longenough"))
            .await
            .unwrap();

        let err = gate
            .register(registration("sparky@example.COM", "longenough", "longenough"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn test_stored_hash_is_not_plaintext() {
        let user = gate()
            .register(registration("a@b.com", "longenough", "longenough"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "longenough");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_login_failures_share_one_error() {
        let gate = gate();
        gate.register(registration("a@b.com", "longenough", "longenough"))
            .await
            .unwrap();

        let wrong_password = gate.login("a@b.com", "wrongpassword").await.unwrap_err();
        let unknown_email = gate.login("nobody@b.com", "longenough").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_login_ignores_case_and_whitespace() {
        let gate = gate();
        let registered = gate
            .register(registration("a@b.com", "longenough", "longenough"))
            .await
            .unwrap();

        let user = gate.login("  A@B.com ", "longenough").await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn test_current_user() {
        let gate = gate();
        let user = gate
            .register(registration("a@b.com", "longenough", "longenough"))
            .await
            .unwrap();

        let found = gate.current_user(user.id).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(gate.current_user(user.id + 1000).await.unwrap().is_none());
    }
}
