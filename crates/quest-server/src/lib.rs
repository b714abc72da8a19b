//! `questd`: HTTP service for user challenges and their progress.
//!
//! Wiring only. The store client is built once from [`ServerConfig`], injected into the
//! [`ChallengeService`], and dropped when the server stops.

pub mod config;
pub use config::{ConfigError, ServerConfig, StoreConfig};

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use quest_api::{HttpApi, ServiceApiAdapter};
use quest_core::ChallengeService;
use quest_prometheus::PrometheusMetrics;
use quest_store::{DocumentStore, FirestoreStore, MemoryStore, StoreError};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Instantiate the configured document store.
pub fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match cfg {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Firestore(fs) => Arc::new(FirestoreStore::new(fs.clone())?),
    };
    Ok(store)
}

/// Challenge routes plus `/metrics`.
pub fn build_app(service: Arc<ChallengeService>, metrics: PrometheusMetrics) -> Router {
    let handler = Arc::new(ServiceApiAdapter::new(service));
    let metrics_routes = Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(metrics);

    HttpApi::new(handler)
        .router()
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
}

/// GET /metrics
async fn render_metrics(State(metrics): State<PrometheusMetrics>) -> Response {
    match metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Build every component from `cfg` and serve until `shutdown` is cancelled.
pub async fn run(cfg: ServerConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let store = build_store(&cfg.store)?;
    info!(store = store.name(), collection = %cfg.collection, "document store ready");

    let metrics = PrometheusMetrics::new()?;
    let service = ChallengeService::new(store)
        .with_collection(cfg.collection.clone())
        .with_metrics(Arc::new(metrics.clone()));

    let address = SocketAddr::new(cfg.bind, cfg.port);
    let listener = TcpListener::bind(address).await?;
    info!(%address, "server listening");

    let app = build_app(Arc::new(service), metrics);
    serve(listener, app, shutdown).await
}

/// Serve `app` on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}
