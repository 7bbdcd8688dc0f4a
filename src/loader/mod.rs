//! CSV loader
//!
//! Reads the track file, maps each row to a [`Document`](crate::index::Document)
//! and submits the whole batch to the index in one call.

mod error;
mod records;
mod runner;

pub use error::LoadError;
pub use records::{build_documents, read_records, Record};
pub use runner::{LoadReport, Loader};
