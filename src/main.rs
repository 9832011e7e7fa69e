mod api;
mod config;
mod models;
mod services;
mod sources;

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_rest_router, AppState};
use config::Config;
use sources::{gecko::GeckoTerminal, MarketDataSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gecko_pool_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::load(&config_path)?;
    tracing::info!("✓ Configuration loaded");

    let source: Arc<dyn MarketDataSource> = Arc::new(GeckoTerminal::new(&config.gecko)?);
    tracing::info!(
        "✓ {} client ready ({}), featured pair {} on {}",
        source.name(),
        config.gecko.base_url,
        config.featured_pair.token_address,
        config.featured_pair.network
    );

    let state = Arc::new(AppState::new(source, config.featured_pair.clone()));
    let app = create_rest_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("✓ Server ready on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
