use std::sync::Arc;

use kovra_service::config::Config;
use kovra_service::ledger_engine::TigerBeetleEngine;
use kovra_service::state::AppState;
use kovra_service::{cache, db, metrics, routes};
use tokio::sync::Mutex;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    init_logging();

    tracing::info!("Starting Kovra ledger service");

    let config = Config::load()?;
    tracing::info!(
        bind_addr = %config.server.bind_addr,
        port = config.server.port,
        "Configuration loaded"
    );

    let db = db::create_pool(&config.database.url, config.database.max_connections).await?;
    tracing::info!("Database connected");

    db::run_migrations(&db).await?;
    tracing::info!("Database migrations complete");

    let engine = TigerBeetleEngine::connect(&config.tigerbeetle)
        .await
        .map_err(|e| eyre::eyre!("failed to connect to TigerBeetle: {e}"))?;
    tracing::info!(
        cluster_id = config.tigerbeetle.cluster_id,
        "Connected to TigerBeetle cluster"
    );

    let state = AppState {
        db,
        engine: Arc::new(engine),
        cache: Arc::new(Mutex::new(cache::ServiceCache::new(&config.cache))),
    };

    metrics::UP.set(1.0);

    let app = routes::build(state);
    let addr: std::net::SocketAddr =
        format!("{}:{}", config.server.bind_addr, config.server.port).parse()?;
    tracing::info!(%addr, "HTTP server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown_signal())
    .await?;

    tracing::info!("Kovra ledger service stopped");
    Ok(())
}

/// Initialize tracing/logging with structured output
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kovra_service=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(filter)
        .init();
}

/// Wait for shutdown signals (SIGINT/SIGTERM)
async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
