//! Gateway state shared across handlers

use super::backend::SearchBackend;
use std::sync::Arc;

#[derive(Clone)]
pub struct GatewayState {
    /// Upstream-call strategy, built once at startup
    pub backend: Arc<dyn SearchBackend>,
}

impl GatewayState {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}
