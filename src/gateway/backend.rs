//! Upstream-call strategies a gateway can be built with

use super::error::GatewayError;
use crate::index::SearchIndex;
use crate::network::{HttpClient, HttpRequest};
use async_trait::async_trait;
use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Body of every `/search` response produced by this system
#[derive(Debug, Serialize)]
pub struct SearchEnvelope {
    pub result: Option<Vec<Value>>,
}

impl SearchEnvelope {
    /// `{"result": null}`
    pub fn empty() -> Self {
        Self { result: None }
    }
}

/// What a backend hands back for a non-empty query
#[derive(Debug)]
pub enum SearchReply {
    /// Hits to wrap as `{"result": hits}`
    Hits(Vec<Value>),
    /// A JSON body relayed without re-encoding
    Raw(String),
}

impl IntoResponse for SearchReply {
    fn into_response(self) -> Response {
        match self {
            Self::Hits(hits) => Json(SearchEnvelope { result: Some(hits) }).into_response(),
            Self::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        }
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short label used in logs and `/health`
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<SearchReply, GatewayError>;
}

/// Queries the search index directly
pub struct IndexBackend {
    index: Arc<dyn SearchIndex>,
}

impl IndexBackend {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl SearchBackend for IndexBackend {
    fn name(&self) -> &str {
        "index"
    }

    async fn search(&self, query: &str) -> Result<SearchReply, GatewayError> {
        let hits = self.index.search(query).await?;
        tracing::debug!("Index '{}' returned {} hits", self.index.name(), hits.len());
        Ok(SearchReply::Hits(hits))
    }
}

/// Forwards to another gateway's `/search` and relays its body verbatim
pub struct ProxyBackend {
    client: HttpClient,
    search_url: Url,
}

impl ProxyBackend {
    /// `upstream` is the base URL of the core gateway
    pub fn new(client: HttpClient, upstream: &str) -> Result<Self, GatewayError> {
        let mut base = Url::parse(upstream)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            search_url: base.join("search")?,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl SearchBackend for ProxyBackend {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn search(&self, query: &str) -> Result<SearchReply, GatewayError> {
        let request = HttpRequest::get(self.search_url.as_str()).param("query", query);
        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(GatewayError::UpstreamStatus(response.status));
        }
        Ok(SearchReply::Raw(response.text))
    }
}
