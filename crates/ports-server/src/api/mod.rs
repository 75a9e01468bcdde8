//! HTTP routes
//!
//! The server holds one [`PortStore`] for its whole lifetime. Each request to `/`
//! streams the configured ports file into it and answers 200 or 500.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use ports_ingest::{FileReader, IngestOrchestrator, PortStore};
use serde_json::json;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::{config::Config, error::AppError, middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<IngestOrchestrator>,
    pub store: Arc<PortStore>,
}

impl AppState {
    /// Wire the store and file reader described by `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(PortStore::new());
        let reader = FileReader::new(config.ingest.ports_file.clone())?;
        let orchestrator = IngestOrchestrator::builder()
            .source(Arc::new(reader))
            .repository(store.clone())
            .build()?;

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            store,
        })
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(ingest_ports))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(middleware::tracing_layer())
}

/// Bind, serve, and stop once `shutdown` resolves
pub async fn serve(
    config: Config,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %listener.local_addr()?,
        ports_file = %config.ingest.ports_file.display(),
        "Server listening"
    );

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    serve_until(listener, app, drain_timeout, shutdown).await
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// In-flight requests then get up to `drain_timeout` to finish; connections still
/// open after that are dropped.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    drain_timeout: Duration,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        shutdown.await;
        let _ = signalled_tx.send(());
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return Ok(result?),
        _ = signalled_rx => {},
    }

    info!(
        timeout_secs = drain_timeout.as_secs(),
        "Shutdown requested, draining connections"
    );
    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => result?,
        Err(_) => warn!("Connections still open after the drain timeout, closing them"),
    }

    Ok(())
}

/// Run one ingestion of the ports file
async fn ingest_ports(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.orchestrator.run().await?;
    info!(ports_upserted = stats.ports_upserted, "Ports updated");

    Ok((StatusCode::OK, "Ports updated successfully"))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "ports": state.store.len(),
    }))
}
