//! Index client trait

use super::error::IndexError;
use super::types::{Document, TaskInfo};
use async_trait::async_trait;
use serde_json::Value;

/// Operations this system needs from the external search index.
///
/// Retrieval semantics belong to the index; implementations only move
/// documents in and hits out.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Index uid
    fn name(&self) -> &str;

    /// Submit a batch of documents in one call
    async fn add_documents(&self, documents: &[Document]) -> Result<TaskInfo, IndexError>;

    /// Run a text query and return the raw hits
    async fn search(&self, query: &str) -> Result<Vec<Value>, IndexError>;

    /// Look up the current state of an enqueued task
    async fn task(&self, uid: u64) -> Result<TaskInfo, IndexError>;
}
