//! Reading CSV rows into records

use super::error::LoadError;
use crate::config::LoaderSettings;
use crate::index::Document;
use csv::StringRecord;
use std::path::Path;

const TRACK_ID_COLUMN: usize = 0;
const TITLE_COLUMN: usize = 2;
const MIN_COLUMNS: usize = TITLE_COLUMN + 1;

/// One input row. Only the identifier and title columns are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub track_id: String,
    pub title: String,
}

impl Record {
    /// Returns `None` for rows shorter than three columns
    pub fn from_row(row: &StringRecord) -> Option<Self> {
        if row.len() < MIN_COLUMNS {
            return None;
        }
        Some(Self {
            track_id: row[TRACK_ID_COLUMN].to_string(),
            title: row[TITLE_COLUMN].to_string(),
        })
    }
}

impl From<Record> for Document {
    fn from(record: Record) -> Self {
        Document {
            track_id: record.track_id,
            title: record.title,
        }
    }
}

/// Read every row of a delimited file
pub fn read_records(path: &Path, settings: &LoaderSettings) -> Result<Vec<Record>, LoadError> {
    if !settings.delimiter.is_ascii() {
        return Err(LoadError::Delimiter(settings.delimiter));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(settings.delimiter as u8)
        .has_headers(settings.has_headers)
        .flexible(true)
        .from_path(path)?;

    // Blank lines never surface as rows
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = Record::from_row(&row).ok_or_else(|| LoadError::ShortRow {
            line: row.position().map(|p| p.line()).unwrap_or_default(),
            columns: row.len(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// One document per record, in input order
pub fn build_documents(records: Vec<Record>) -> Vec<Document> {
    records.into_iter().map(Document::from).collect()
}
