use anyhow::Context;
use tracing_subscriber::EnvFilter;

use storefront_admin::{app, config::AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_admin=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Storefront Admin API in {:?} mode ({:?} catalog)",
        config.environment,
        config.database.backend
    );
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every mutating request will be rejected");
    }

    let port = config.api.port;
    let state = AppState::from_config(config)
        .await
        .context("failed to open catalog")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Storefront Admin API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
