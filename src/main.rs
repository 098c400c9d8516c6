//! Flood Guard Backend — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use floodguard_backend::{api, config::AppConfig, metrics::Metrics};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("floodguard_backend=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::from_env();
    let addr = config.bind_addr;
    tracing::info!(
        weather_api = config.weather_api_configured(),
        news_api = config.news_api_configured(),
        "provider keys"
    );

    let metrics = Metrics::init();
    let state = api::AppState::from_config(config)?;
    let router = api::create_router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "flood guard backend listening");
    axum::serve(listener, router).await?;

    Ok(())
}
