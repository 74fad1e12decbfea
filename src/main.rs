//! Insight Portal server — role-based analytics portal backend.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use insight_api::{AppState, build_router};
use insight_core::config::AppConfig;
use insight_core::error::AppError;
use insight_database::repositories::session::SessionRepository;

#[tokio::main]
async fn main() {
    let env = std::env::var("INSIGHT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Insight Portal v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db_pool = insight_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    insight_database::migration::run_migrations(&db_pool).await?;

    // Tombstoned and lapsed session rows from previous runs.
    let sessions = SessionRepository::new(db_pool.clone());
    let purged = sessions.purge_expired(chrono::Utc::now()).await?;
    if purged > 0 {
        tracing::info!(purged, "purged expired sessions");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, db_pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Insight Portal listening on {addr}");

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            return match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
                Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
            };
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => return Err(AppError::internal(format!("Server error: {e}"))),
        Ok(Err(e)) => return Err(AppError::internal(format!("Server task failed: {e}"))),
        Err(_) => tracing::warn!("Graceful shutdown timed out, exiting"),
    }

    tracing::info!("Insight Portal shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
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
}
