//! Bulk-loads the track CSV into the search index, then exits.

use anyhow::{Context, Result};
use std::sync::Arc;
use track_search::config::IndexEngine;
use track_search::loader::Loader;
use track_search::{config, network::HttpClient, MeiliClient, SearchIndex, TantivyIndex};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    track_search::init_logging();

    info!("Starting track-loader v{}", track_search::VERSION);

    let settings = config::load()?;

    let index: Arc<dyn SearchIndex> = match settings.index.engine {
        IndexEngine::Meilisearch => {
            let client = HttpClient::with_settings(&settings.outgoing)?;
            info!("Loading into index '{}' at {}", settings.index.name, settings.index.url);
            Arc::new(MeiliClient::new(client, &settings.index))
        }
        IndexEngine::Tantivy => {
            info!("Loading into embedded index '{}'", settings.index.name);
            Arc::new(TantivyIndex::open(&settings.index).context("Failed to open embedded index")?)
        }
    };

    let report = Loader::new(index, settings.loader.clone())
        .run()
        .await
        .with_context(|| format!("Failed to load {}", settings.loader.path.display()))?;

    info!(
        "Loaded {} of {} records (task {}, {:?})",
        report.documents, report.records, report.task.uid, report.task.status
    );

    Ok(())
}
