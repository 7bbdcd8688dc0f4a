//! Route definitions

use super::backend::SearchBackend;
use super::error::GatewayError;
use super::handlers;
use super::state::GatewayState;
use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

/// Build a gateway router around an upstream-call strategy.
///
/// Both the core and the proxy gateway come out of this function; they differ
/// only in `backend` and `allowed_origin`.
pub fn create_router(
    backend: Arc<dyn SearchBackend>,
    allowed_origin: &str,
) -> Result<Router, GatewayError> {
    let cors = cors_layer(allowed_origin)?;

    Ok(Router::new()
        .route("/search", get(handlers::search))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(GatewayState::new(backend)))
}

/// Single-origin CORS with credentials.
///
/// Wildcards cannot be combined with credentials, so methods and headers are
/// mirrored from the preflight instead.
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, GatewayError> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|_| GatewayError::InvalidOrigin(allowed_origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
