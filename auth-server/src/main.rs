mod api;
mod config;
mod db;
mod error;
mod session;
mod state;

use anyhow::Context;
use config::Config;
use session::SessionStore;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_server=info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // Connect to PostgreSQL
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .idle_timeout(std::time::Duration::from_secs(600))
        .max_lifetime(std::time::Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("Connected to PostgreSQL");

    // Run migrations (idempotent, fast on restarts)
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = Arc::new(AppState {
        db: pool,
        sessions: SessionStore::new(config.session_ttl_minutes),
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    info!(port = config.port, "auth-server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
