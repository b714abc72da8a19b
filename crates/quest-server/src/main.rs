use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use quest_observe::init_logger;
use quest_server::{ServerConfig, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let cfg = ServerConfig::from_env()?;

    // 2) Logger
    init_logger(&cfg.logger)?;
    info!(format = %cfg.logger.format, level = %cfg.logger.level, "logger initialized");

    // 3) Shutdown on Ctrl+C / SIGTERM
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    // 4) Serve
    info!(store = cfg.store.name(), port = cfg.port, "starting questd");
    run(cfg, shutdown).await
}

async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    token.cancel();
}
