//! HTTP networking module
//!
//! Provides the outbound client shared by the index client and the proxy gateway.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{HttpMethod, HttpRequest, HttpResponse};
