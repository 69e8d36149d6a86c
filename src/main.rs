use anyhow::Context;
use tracing_subscriber::EnvFilter;

use duech_api_rust::config::{AppConfig, CONFIG};
use duech_api_rust::database::DatabaseManager;
use duech_api_rust::{app, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if is_production!() {
        tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).compact().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Initialize configuration (this loads the config singleton)
    let config: AppConfig = (*CONFIG).clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting DUECh API in {:?} mode", config.environment);

    let store = DatabaseManager::open_store(&config).await.context("failed to open dictionary store")?;
    tracing::info!("Dictionary store ready ({})", store.backend());

    let port = config.port;
    let state = AppState::new(config, store).context("failed to load session keys")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 DUECh API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
