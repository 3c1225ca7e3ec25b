//! Relay in front of the recipe API. Browsers call this instead of the
//! upstream so the API key never leaves the server.

use std::net::SocketAddr;

use nutrition_tracker::config::{load_dotenv, ProxyConfig};
use nutrition_tracker::io::proxy::create_proxy_router;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    load_dotenv();
    let config = ProxyConfig::from_env();
    info!("Relaying /recipe2-api to {}", config.base_url);
    if config.api_key.is_some() {
        info!("API key configured");
    } else {
        warn!("No API key configured, upstream requests are sent without authorization");
    }

    let app = create_proxy_router(&config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Proxy listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
