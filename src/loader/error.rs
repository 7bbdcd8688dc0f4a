use crate::index::IndexError;
use thiserror::Error;

/// Failures while loading the CSV into the index
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row on line {line} has {columns} columns, need at least 3")]
    ShortRow { line: u64, columns: usize },

    #[error("delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),

    #[error(transparent)]
    Index(#[from] IndexError),
}
