//! Query gateways
//!
//! One router builder serves both the core gateway (backed by the index) and
//! the proxy gateway (backed by the core gateway).

mod backend;
mod error;
mod handlers;
mod routes;
mod state;

pub use backend::{IndexBackend, ProxyBackend, SearchBackend, SearchEnvelope, SearchReply};
pub use error::GatewayError;
pub use routes::create_router;
pub use state::GatewayState;

use crate::config::GatewaySettings;
use axum::Router;
use std::net::SocketAddr;
use tracing::info;

/// Bind the configured address and serve until the process exits
pub async fn serve(router: Router, settings: &GatewaySettings) -> anyhow::Result<()> {
    let addr = SocketAddr::new(settings.bind_address.parse()?, settings.port);

    info!("Starting server on http://{}", addr);
    info!("Allowing cross-origin requests from {}", settings.allowed_origin);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
