use crate::index::IndexError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("invalid upstream url: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("invalid allowed origin: {0:?}")]
    InvalidOrigin(String),
}

/// Every failure reaches the client as the same generic 500
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!("Search failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "internal server error" })),
        )
            .into_response()
    }
}
