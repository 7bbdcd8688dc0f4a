//! Document and task types exchanged with the index

use serde::{Deserialize, Serialize};

/// The shape submitted to the index for one CSV row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub track_id: String,
    pub title: String,
}

impl Document {
    pub fn new(track_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            title: title.into(),
        }
    }
}

/// Lifecycle state of an asynchronous index task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Error details attached to a failed task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A task as reported by the index.
///
/// Enqueue responses carry `taskUid`, task lookups carry `uid`; both land in
/// `uid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    #[serde(rename = "taskUid", alias = "uid")]
    pub uid: u64,
    pub status: TaskStatus,
    #[serde(default)]
    pub error: Option<TaskError>,
}
