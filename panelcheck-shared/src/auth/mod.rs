/// Authentication for PanelCheck
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and registration rules
/// - [`gate`]: registration and credential checks
///
/// Sessions themselves live in the HTTP layer. The gate only answers "who is
/// this" for a set of credentials.
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, 19 MiB memory, 2 iterations
/// - **Login**: identical failure for unknown email and wrong password

pub mod gate;
pub mod password;

pub use gate::{AuthError, AuthGate, RegisterUser};
