//! HTTP client for talking to the index and to the core gateway

use super::request::{HttpMethod, HttpRequest, HttpResponse};
use crate::config::OutgoingSettings;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper with track-search configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> reqwest::Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> reqwest::Result<Self> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(concat!("track-search/", env!("CARGO_PKG_VERSION")));

        // reqwest never times out unless told to
        if let Some(secs) = settings.request_timeout {
            builder = builder.timeout(Duration::from_secs_f64(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Execute a request
    pub async fn execute(&self, request: HttpRequest) -> reqwest::Result<HttpResponse> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder.header("Accept", "application/json");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(json) = request.json {
            req_builder = req_builder.json(&json);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into HttpResponse
    async fn parse_response(response: Response) -> reqwest::Result<HttpResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(HttpResponse { status, text })
    }
}
