//! Campus Ledger - Main Application Entry Point
//!
//! REST API server for two independent applications sharing one process:
//! a personal expense ledger (accounts, transactions, expenses, reports)
//! and a student attendance register (students, faculty, attendance).
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: bearer sessions with SHA-256 hashed tokens (ledger only)
//! - **Format**: JSON requests/responses, xlsx and SVG for reports
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Seed the default expense and income categories
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

use campus_ledger::{
    app::{self, AppState},
    config, db,
    models::profile::Currency,
    services::category_service,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    let default_currency: Currency = config
        .default_currency
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let (expense, income) = category_service::ensure_default_categories(&pool).await?;
    tracing::info!(expense, income, "Default categories checked");

    let state = AppState {
        pool,
        session_ttl: chrono::Duration::hours(config.session_ttl_hours),
        default_currency,
    };
    let app = app::build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
