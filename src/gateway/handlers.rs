//! HTTP request handlers

use super::backend::SearchEnvelope;
use super::error::GatewayError;
use super::state::GatewayState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

/// Query parameters for search
#[derive(Debug, Default)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    /// A repeated `query` key keeps its last value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = pairs
            .into_iter()
            .filter(|(key, _)| key == "query")
            .map(|(_, value)| value)
            .last();
        Self { query }
    }
}

/// Search handler
pub async fn search(
    State(state): State<GatewayState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, GatewayError> {
    // Absent or empty query never reaches the upstream
    let query = match SearchParams::from_pairs(pairs).query {
        Some(q) if !q.is_empty() => q,
        _ => return Ok(Json(SearchEnvelope::empty()).into_response()),
    };

    let reply = state.backend.search(&query).await?;
    Ok(reply.into_response())
}

/// Health check handler
pub async fn health(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "backend": state.backend.name(),
    }))
}
