/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use panelcheck_api::{app::{build_router, AppState}, config::Config};
/// use panelcheck_shared::{
///     analysis::MockAnalyzer,
///     models::AnalysisResult,
///     store::memory::MemoryStore,
/// };
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let analyzer = MockAnalyzer::returning(AnalysisResult {
///     compliant: true,
///     issues: vec![],
///     recommendations: vec![],
///     summary: "OK".to_string(),
/// });
///
/// let state = AppState::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(analyzer),
///     config,
/// );
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, build_router(state, tower_sessions::MemoryStore::default())).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        security::SecurityHeadersLayer,
        session::{create_session_layer, require_auth},
    },
    routes,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use panelcheck_shared::{analysis::PanelAnalyzer, auth::AuthGate, store::RecordStore};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tower_sessions::SessionStore;
use tracing::Level;

/// Request body limit, sized for base64-encoded panel photos
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Record store backend
    pub store: Arc<dyn RecordStore>,

    /// Registration and credential checks
    pub auth: AuthGate,

    /// Panel analysis service
    pub analyzer: Arc<dyn PanelAnalyzer>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        store: Arc<dyn RecordStore>,
        analyzer: Arc<dyn PanelAnalyzer>,
        config: Config,
    ) -> Self {
        Self {
            auth: AuthGate::new(store.clone()),
            store,
            analyzer,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// `sessions` is where login sessions are kept: tower-sessions' in-memory
/// store or its PostgreSQL store, matching the record store backend.
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                      # Health check (public)
/// └── /api/
///     ├── POST /register               # public
///     ├── POST /login                  # public
///     ├── POST /logout                 # session required from here on
///     ├── GET  /user
///     ├── GET|POST /projects
///     ├── GET|PATCH /projects/:id
///     ├── GET|POST /projects/:id/notes
///     ├── GET  /projects/:id/analyses
///     └── POST /projects/:id/analyze
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS
/// 3. Logging (tower-http TraceLayer)
/// 4. Sessions (tower-sessions)
/// 5. Body size limit, enforced by the JSON extractor
/// 6. Session authentication (gated routes only)
pub fn build_router<S>(state: AppState, sessions: S) -> Router
where
    S: SessionStore + Clone,
{
    let public_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let gated_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/user", get(routes::auth::current_user))
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project).patch(routes::projects::update_project_status),
        )
        .route(
            "/projects/:id/notes",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/projects/:id/analyses",
            get(routes::analyses::list_analyses),
        )
        .route(
            "/projects/:id/analyze",
            post(routes::analyses::analyze_panel),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_routes = Router::new().merge(public_routes).merge(gated_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(create_session_layer(sessions, &state.config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
