//! Proxy gateway: answers `/search` by forwarding to the core gateway.

use anyhow::Result;
use std::sync::Arc;
use track_search::gateway::{self, ProxyBackend};
use track_search::{config, network::HttpClient};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    track_search::init_logging();

    info!("Starting track-proxy v{}", track_search::VERSION);

    let settings = config::load()?;

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let backend = ProxyBackend::new(client, &settings.proxy.upstream_url)?;
    info!("Forwarding searches to {}", backend.search_url());

    let app = gateway::create_router(Arc::new(backend), &settings.proxy.server.allowed_origin)?;

    gateway::serve(app, &settings.proxy.server).await
}
