/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Register and log in
/// - `POST /api/login` - Log in
/// - `POST /api/logout` - End the current session
/// - `GET /api/user` - The logged-in user
///
/// Register and login store the user's id in the tower-sessions session, so
/// the session layer answers with a `Set-Cookie` header. The password hash
/// is never serialized.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::AppJson,
    middleware::session::{end_session, start_session, AuthContext},
};
use axum::{extract::State, http::StatusCode, Json};
use panelcheck_shared::{auth::RegisterUser, models::User};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (at least 8 characters)
    pub password: String,

    /// Must equal `password`
    pub confirm_password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// {
///   "email": "sparky@example.com",
///   "password": "breaker-box-42",
///   "confirmPassword": "breaker-box-42"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the user and a session cookie:
///
/// ```json
/// { "id": 1, "email": "sparky@example.com" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email, short password or mismatched confirmation
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    AppJson(mut req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.email = req.email.trim().to_string();
    req.validate()?;

    let user = state
        .auth
        .register(RegisterUser {
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        })
        .await?;

    start_session(&session, user.id).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "email": "sparky@example.com", "password": "breaker-box-42" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<User>> {
    let user = state.auth.login(&req.email, &req.password).await?;

    start_session(&session, user.id).await?;

    Ok(Json(user))
}

/// End the current session and clear the cookie
pub async fn logout(session: Session, auth: AuthContext) -> ApiResult<Json<LogoutResponse>> {
    end_session(&session).await?;

    tracing::info!(user_id = auth.user.id, "User logged out");

    Ok(Json(LogoutResponse {
        message: "Logged out".to_string(),
    }))
}

/// The user behind the current session
pub async fn current_user(auth: AuthContext) -> Json<User> {
    Json(auth.user)
}
