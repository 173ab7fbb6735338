use std::net::SocketAddr;
use std::sync::Arc;

use mimalloc::MiMalloc;
use pokedash::config::AppConfig;
use pokedash::db::{self, PgSightingStore};
use pokedash::{routes, AppState};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()?;

    // Lazy pool: an unreachable store shows up as failed refresh ticks
    // instead of aborting start-up.
    let pool = db::create_lazy_pool(&config.database_url, config.database_max_connections)?;
    let store = PgSightingStore::new(pool.clone(), config.sightings_table.clone())?;
    let state = AppState::new(config.clone(), Arc::new(store));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = if config.auto_refresh {
        Some(state.dashboard.clone().spawn(config.refresh_interval(), shutdown_rx))
    } else {
        tracing::info!("Auto refresh disabled; dashboard renders once on first request");
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(
        host = %addr,
        table = %config.sightings_table,
        refresh_interval_ms = config.refresh_interval_ms,
        auto_refresh = config.auto_refresh,
        "Starting PokéDash server"
    );

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = refresher {
        handle.await?;
    }
    pool.close().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
