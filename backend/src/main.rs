//! Pantry Ledger - Backend Server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use pantry_ledger_backend::{
    config::{Config, StorageBackend},
    create_app,
    store::{LedgerStore, MemoryLedgerStore, PgLedgerStore},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    init_tracing(config.logging.json);

    tracing::info!("Starting Pantry Ledger Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Reconcile mode: {:?}", config.reconcile.mode);

    let (store, pg_store): (Arc<dyn LedgerStore>, Option<PgLedgerStore>) =
        match config.storage.backend {
            StorageBackend::Postgres => {
                // Create database connection pool
                tracing::info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .min_connections(config.database.min_connections)
                    .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                    .connect(&config.database.url)
                    .await?;
                tracing::info!("Database connection established");

                let pg_store = PgLedgerStore::new(db_pool);
                if config.database.run_migrations {
                    tracing::info!("Running database migrations...");
                    pg_store.migrate().await?;
                    tracing::info!("Migrations completed");
                }
                (Arc::new(pg_store.clone()), Some(pg_store))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory ledger; movements are lost on shutdown");
                (Arc::new(MemoryLedgerStore::new()), None)
            }
        };

    // Create application state
    let state = AppState::from_config(store, &config);

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg_store) = pg_store {
        pg_store.close().await;
        tracing::info!("Database connections closed");
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "pantry_server=debug,pantry_ledger_backend=debug,tower_http=debug,sqlx=warn".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
    tracing::info!("Shutdown signal received");
}
