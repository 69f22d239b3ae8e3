//! Screenroom HTTP server
//!
//! Entry point: loads configuration, wires the storage backend and
//! services, and serves the site until a shutdown signal arrives.

use std::sync::Arc;

use application::{ScreeningRequestService, ports::ScreeningRequestStore};
use infrastructure::{
    AppConfig, InMemoryScreeningRequestStore, SessionManager, SqliteScreeningRequestStore,
    StorageBackend, create_pool,
};
use presentation_http::{
    AppState, RateLimiterConfig, RateLimiterLayer, StaticAssets, create_router,
};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screenroom_server=debug,presentation_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Screenroom v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = %config.environment,
        backend = %config.database.backend,
        "Configuration loaded"
    );

    // Pick the storage backend
    let store: Arc<dyn ScreeningRequestStore> = match config.database.backend {
        StorageBackend::Sqlite => {
            let pool = create_pool(&config.database)
                .map_err(|e| anyhow::anyhow!("Failed to open database: {e}"))?;
            Arc::new(SqliteScreeningRequestStore::new(Arc::new(pool)))
        },
        StorageBackend::Memory => Arc::new(InMemoryScreeningRequestStore::new()),
    };

    // Assemble app state
    let state = AppState {
        screening_service: ScreeningRequestService::new(store),
        sessions: Arc::new(SessionManager::new(
            config.security.session_secret.as_ref(),
            config.environment,
        )),
        assets: Arc::new(StaticAssets::new(config.assets.root.clone())),
        environment: config.environment,
    };

    // Configure the rate limiter
    let rate_limiter = RateLimiterLayer::new(&RateLimiterConfig {
        enabled: config.security.rate_limit_enabled,
        max_requests: config.security.rate_limit_max_requests,
        window_ms: config.security.rate_limit_window_ms,
    });

    let app = create_router(state, rate_limiter);

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
