use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use tasks_api_rust::auth::JwtVerifier;
use tasks_api_rust::store::{postgres, PgTaskStore};
use tasks_api_rust::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting tasks API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set");
    }
    if config.security.api_path_secret.trim_matches('/').is_empty() {
        anyhow::bail!("API_PATH_SECRET must be set to a non-empty path segment");
    }

    let database_url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    // Single long-lived pool, shared across all requests
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .connect(database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("database connected");

    postgres::ensure_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("failed to ensure schema: {}", e))?;

    let state = AppState {
        verifier: Arc::new(JwtVerifier::new(&config.security.jwt_secret)),
        store: Arc::new(PgTaskStore::new(pool)),
        api_path_secret: config.security.api_path_secret.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server")?;

    Ok(())
}
