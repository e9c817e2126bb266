//! Bookshelf Server - book lending backend

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api,
    config::{AppConfig, Cli, LoggingConfig},
    storage::{run_migrations, BackendKind, MemoryStorage, MigrationOutcome, PgStorage, Storage},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli).context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let (storage, backend) = select_storage(&config).await?;
    tracing::info!(%backend, "storage backend selected");

    let addr = config.server.addr();
    let state = AppState { storage, backend };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookshelf_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect to PostgreSQL and migrate it, or fall back to memory when the
/// database cannot be reached. A failed migration aborts startup.
async fn select_storage(config: &AppConfig) -> anyhow::Result<(Arc<dyn Storage>, BackendKind)> {
    let pg = match PgStorage::connect(&config.database).await {
        Ok(pg) => pg,
        Err(e) => {
            tracing::error!(error = %e, "connecting to database failed, using in-memory storage");
            let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
            return Ok((storage, BackendKind::Memory));
        }
    };
    tracing::info!("Connected to database");

    let outcome = run_migrations(&config.database.url, &config.database.migrations_path)
        .await
        .context("Failed to run database migrations")?;
    match outcome {
        MigrationOutcome::Applied(count) => tracing::info!(count, "database migrations applied"),
        MigrationOutcome::NoChange => tracing::info!("no database migrations to apply"),
    }

    let storage: Arc<dyn Storage> = Arc::new(pg);
    Ok((storage, BackendKind::Postgres))
}
