//! Embedded tantivy implementation of [`SearchIndex`]
//!
//! Titles are indexed as lowercased 1-5 character ngrams and matched with a
//! single fuzzy term, so short and misspelled queries still find tracks
//! without a separate search server.

use super::error::IndexError;
use super::traits::SearchIndex;
use super::types::{Document, TaskInfo, TaskStatus};
use crate::config::{EmbeddedSettings, IndexSettings};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::FuzzyTermQuery;
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TantivyDocument, TextFieldIndexing, TextOptions, Value as _,
    STORED, STRING,
};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, TextAnalyzer};
use tantivy::{doc, Index, IndexReader, ReloadPolicy, Term};
use tracing::{debug, info};

const TITLE_TOKENIZER: &str = "title_ngram";
const META_FILE: &str = "meta.json";

struct Shared {
    index: Index,
    reader: IndexReader,
    track_id: Field,
    title: Field,
    settings: EmbeddedSettings,
}

/// In-process tantivy index
#[derive(Clone)]
pub struct TantivyIndex {
    name: String,
    shared: Arc<Shared>,
    next_task: Arc<AtomicU64>,
}

fn build_schema() -> Schema {
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(TITLE_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let title_options = TextOptions::default()
        .set_indexing_options(indexing)
        .set_stored();

    let mut builder = Schema::builder();
    builder.add_text_field("track_id", STRING | STORED);
    builder.add_text_field("title", title_options);
    builder.build()
}

fn register_tokenizer(index: &Index) -> Result<(), IndexError> {
    let analyzer = TextAnalyzer::builder(NgramTokenizer::new(1, 5, false)?)
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(TITLE_TOKENIZER, analyzer);
    Ok(())
}

fn open_index(path: Option<&Path>) -> Result<Index, IndexError> {
    let Some(path) = path else {
        return Ok(Index::create_in_ram(build_schema()));
    };

    if path.join(META_FILE).exists() {
        info!("Opening embedded index at {}", path.display());
        return Ok(Index::open_in_dir(path)?);
    }

    info!("Creating embedded index at {}", path.display());
    std::fs::create_dir_all(path)?;
    Ok(Index::create_in_dir(path, build_schema())?)
}

impl TantivyIndex {
    /// Open the index at the configured path, creating it when absent.
    ///
    /// Without a path the index lives in memory only.
    pub fn open(settings: &IndexSettings) -> Result<Self, IndexError> {
        let embedded = settings.embedded.clone();
        let index = open_index(embedded.path.as_deref())?;
        register_tokenizer(&index)?;

        let schema = index.schema();
        let track_id = schema.get_field("track_id")?;
        let title = schema.get_field("title")?;
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(Self {
            name: settings.name.clone(),
            shared: Arc::new(Shared {
                index,
                reader,
                track_id,
                title,
                settings: embedded,
            }),
            next_task: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Documents currently visible to searches
    pub fn num_docs(&self) -> u64 {
        self.shared.reader.searcher().num_docs()
    }
}

impl Shared {
    fn write(&self, documents: &[Document]) -> Result<(), IndexError> {
        // The writer holds the directory lock, so it only lives for one batch
        let mut writer = self
            .index
            .writer::<TantivyDocument>(self.settings.writer_heap_bytes)?;

        for document in documents {
            writer.delete_term(Term::from_field_text(self.track_id, &document.track_id));
            writer.add_document(doc!(
                self.track_id => document.track_id.clone(),
                self.title => document.title.clone()
            ))?;
        }

        writer.commit()?;
        self.reader.reload()?;
        Ok(())
    }

    fn search(&self, query: &str) -> Result<Vec<Value>, IndexError> {
        let term = Term::from_field_text(self.title, &query.to_lowercase());
        let query = FuzzyTermQuery::new(term, self.settings.fuzzy_distance, true);

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(self.settings.search_limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let retrieved: TantivyDocument = searcher.doc(address)?;
            let text = |field: Field| {
                retrieved
                    .get_first(field)
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            hits.push(json!({
                "track_id": text(self.track_id),
                "title": text(self.title),
                "score": score,
            }));
        }
        Ok(hits)
    }
}

#[async_trait]
impl SearchIndex for TantivyIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_documents(&self, documents: &[Document]) -> Result<TaskInfo, IndexError> {
        let shared = self.shared.clone();
        let batch = documents.to_vec();
        tokio::task::spawn_blocking(move || shared.write(&batch)).await??;

        let uid = self.next_task.fetch_add(1, Ordering::Relaxed);
        debug!("Committed {} documents as task {}", documents.len(), uid);
        Ok(TaskInfo {
            uid,
            status: TaskStatus::Succeeded,
            error: None,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Value>, IndexError> {
        let shared = self.shared.clone();
        let query = query.to_string();
        tokio::task::spawn_blocking(move || shared.search(&query)).await?
    }

    /// Commits are synchronous, so every task has already succeeded
    async fn task(&self, uid: u64) -> Result<TaskInfo, IndexError> {
        Ok(TaskInfo {
            uid,
            status: TaskStatus::Succeeded,
            error: None,
        })
    }
}
