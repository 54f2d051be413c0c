/// Cookie sessions
///
/// Sessions are managed by tower-sessions: [`create_session_layer`] builds
/// the `SessionManagerLayer` over whichever store the server runs with, and
/// the session only ever holds the logged-in user's id.
///
/// [`require_auth`] guards every route except registration, login and
/// health: it resolves the session to a user and attaches an
/// [`AuthContext`] to the request, or answers 401.

use crate::{app::AppState, config::Config, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use panelcheck_shared::models::User;
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, Session, SessionManagerLayer, SessionStore,
};

/// Session cookie name
pub const SESSION_COOKIE: &str = "panelcheck_session";

/// Session key holding the logged-in user's id
const USER_ID_KEY: &str = "user_id";

/// The authenticated caller of a gated route
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(unauthorized)
    }
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Authentication required".to_string())
}

/// Create the session layer over `store`
///
/// Cookies are `HttpOnly`, `SameSite=Lax`, scoped to `/` and marked `Secure`
/// in production. A session expires after `SESSION_TTL_HOURS` without use.
pub fn create_session_layer<S>(store: S, config: &Config) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.session.ttl_hours,
        )))
        .with_secure(config.api.production)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Logs `user_id` into the session under a fresh session id
pub async fn start_session(session: &Session, user_id: i64) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}

/// Deletes the session and expires its cookie
pub async fn end_session(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}

/// Session authentication middleware
///
/// Loads the user behind the session and injects [`AuthContext`] into
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session
        .get::<i64>(USER_ID_KEY)
        .await?
        .ok_or_else(unauthorized)?;

    let Some(user) = state.auth.current_user(user_id).await? else {
        tracing::warn!(user_id, "Session points at a missing user");
        end_session(&session).await?;
        return Err(unauthorized());
    };

    tracing::debug!(user_id = user.id, "Session resolved");

    req.extensions_mut().insert(AuthContext { user });

    Ok(next.run(req).await)
}
