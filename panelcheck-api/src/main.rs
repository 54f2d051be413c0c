//! # PanelCheck API Server
//!
//! Loads configuration, selects the storage backend, builds the analysis
//! client and serves the router until Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run -p panelcheck-api
//! ```
//!
//! Without `DATABASE_URL` records and sessions are kept in memory and are
//! lost on restart.

use anyhow::Context;
use panelcheck_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StorageBackend},
};
use panelcheck_shared::{
    analysis::{OpenAiAnalyzer, OpenAiConfig},
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore, RecordStore},
};
use std::{sync::Arc, time::Duration};
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are deleted from PostgreSQL
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "panelcheck_api=debug,panelcheck_shared=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    tracing::info!(
        "PanelCheck API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let analyzer = OpenAiAnalyzer::new(OpenAiConfig {
        api_key: config.analysis.api_key.clone(),
        model: config.analysis.model.clone(),
        base_url: config.analysis.base_url.clone(),
        timeout: Duration::from_secs(config.analysis.timeout_seconds),
    })?;

    let analyzer = Arc::new(analyzer);
    let bind_address = config.bind_address();
    tracing::info!(
        storage = config.storage_name(),
        model = %config.analysis.model,
        "Configuration loaded"
    );

    let (app, pool) = match config.storage.clone() {
        StorageBackend::Memory => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");

            let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
            let state = AppState::new(store, analyzer, config);
            (
                build_router(state, tower_sessions::MemoryStore::default()),
                None,
            )
        }
        StorageBackend::Postgres(db) => {
            ensure_database_exists(&db.url).await?;

            let pool = create_pool(DatabaseConfig {
                url: db.url.clone(),
                max_connections: db.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to connect to database")?;

            run_migrations(&pool).await?;

            let sessions = PostgresStore::new(pool.clone());
            tokio::spawn(purge_expired_sessions(sessions.clone()));

            let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool.clone()));
            let state = AppState::new(store, analyzer, config);
            (build_router(state, sessions), Some(pool))
        }
    };

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn purge_expired_sessions(sessions: PostgresStore) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);

    loop {
        interval.tick().await;
        if let Err(e) = sessions.delete_expired().await {
            tracing::warn!(error = %e, "Failed to delete expired sessions");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
