//! Plotline API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use plotline_core::clock::SystemClock;
use plotline_core::store::{GraphStore, ScriptStore};
use plotline_store::schema::ensure_schema;
use plotline_store::{InMemoryGraphStore, InMemoryScriptStore, PgGraphStore, PgScriptStore};
use plotline_sync::{PositionSync, TokioScheduler};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plotline_api::config::Config;
use plotline_api::error::AppError;
use plotline_api::routes;
use plotline_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Plotline API server");

    let config = Config::from_env()?;

    let store: Arc<dyn GraphStore>;
    let scripts: Arc<dyn ScriptStore>;
    if let Some(database_url) = &config.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        ensure_schema(&pool)
            .await
            .map_err(|e| AppError::Config(format!("could not prepare schema: {e}")))?;
        tracing::info!("Using PostgreSQL graph store and catalogue");
        store = Arc::new(PgGraphStore::new(pool.clone()));
        scripts = Arc::new(PgScriptStore::new(pool));
    } else {
        tracing::info!(
            latency_ms = config.store_latency.as_millis(),
            "DATABASE_URL not set, using in-memory graph store and catalogue"
        );
        store = Arc::new(InMemoryGraphStore::with_latency(config.store_latency));
        scripts = Arc::new(InMemoryScriptStore::new());
    }

    // Build application state.
    let scheduler = Arc::new(TokioScheduler::new(tokio::runtime::Handle::current()));
    let sync = PositionSync::new(Arc::clone(&store), scheduler, config.save_debounce);
    let app_state = AppState::new(Arc::new(SystemClock), store, scripts, sync);

    // Build router.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/scripts", routes::script_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
