use thiserror::Error;

/// Failures talking to the search index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode index response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed index response: {0}")]
    MalformedResponse(String),

    #[error("index task {uid} failed: {message}")]
    TaskFailed { uid: u64, message: String },

    #[error("index task {0} did not finish in time")]
    TaskTimeout(u64),

    #[error("embedded index error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("embedded index I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("embedded index worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
