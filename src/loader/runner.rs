//! One-shot load of the CSV into the index

use super::error::LoadError;
use super::records::{build_documents, read_records};
use crate::config::LoaderSettings;
use crate::index::{IndexError, SearchIndex, TaskInfo, TaskStatus};
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Outcome of a completed load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Rows read from the file
    pub records: usize,
    /// Documents submitted in the batch
    pub documents: usize,
    /// Last known state of the addition task
    pub task: TaskInfo,
}

/// Reads the configured file and submits it to the index as one batch
pub struct Loader {
    index: Arc<dyn SearchIndex>,
    settings: LoaderSettings,
}

impl Loader {
    pub fn new(index: Arc<dyn SearchIndex>, settings: LoaderSettings) -> Self {
        Self { index, settings }
    }

    pub async fn run(&self) -> Result<LoadReport, LoadError> {
        let records = read_records(&self.settings.path, &self.settings)?;
        let record_count = records.len();
        info!(
            "Read {} records from {}",
            record_count,
            self.settings.path.display()
        );

        let documents = build_documents(records);
        let task = self.index.add_documents(&documents).await?;
        info!(
            "Submitted {} documents to index '{}' (task {})",
            documents.len(),
            self.index.name(),
            task.uid
        );

        let task = if self.settings.wait_for_task {
            self.wait_for_task(task).await?
        } else {
            task
        };

        Ok(LoadReport {
            records: record_count,
            documents: documents.len(),
            task,
        })
    }

    /// Poll the task until the index reports it finished
    async fn wait_for_task(&self, mut task: TaskInfo) -> Result<TaskInfo, IndexError> {
        let deadline = self.settings.task_timeout().map(|t| Instant::now() + t);

        while !task.status.is_finished() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(IndexError::TaskTimeout(task.uid));
            }
            sleep(self.settings.poll_interval()).await;
            task = self.index.task(task.uid).await?;
            debug!("Task {} is {:?}", task.uid, task.status);
        }

        match task.status {
            TaskStatus::Succeeded => {
                info!("Task {} succeeded", task.uid);
                Ok(task)
            }
            _ => Err(IndexError::TaskFailed {
                uid: task.uid,
                message: task
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| format!("task ended as {:?}", task.status)),
            }),
        }
    }
}
