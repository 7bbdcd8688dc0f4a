//! Core gateway: answers `/search` straight from the search index.

use anyhow::{Context, Result};
use std::sync::Arc;
use track_search::config::{IndexEngine, Settings};
use track_search::gateway::{self, IndexBackend};
use track_search::loader::Loader;
use track_search::{config, network::HttpClient, MeiliClient, SearchIndex, TantivyIndex};
use tracing::info;

/// Open the embedded index, building it from the track file on first start
async fn embedded_index(settings: &Settings) -> Result<Arc<dyn SearchIndex>> {
    let index = Arc::new(TantivyIndex::open(&settings.index).context("Failed to open embedded index")?);

    if index.num_docs() == 0 {
        info!("Embedded index is empty, building it from {}", settings.loader.path.display());
        let report = Loader::new(index.clone(), settings.loader.clone())
            .run()
            .await
            .with_context(|| format!("Failed to load {}", settings.loader.path.display()))?;
        info!("Indexed {} documents", report.documents);
    }

    Ok(index)
}

#[tokio::main]
async fn main() -> Result<()> {
    track_search::init_logging();

    info!("Starting track-core v{}", track_search::VERSION);

    let settings = config::load()?;

    let index: Arc<dyn SearchIndex> = match settings.index.engine {
        IndexEngine::Meilisearch => {
            let client = HttpClient::with_settings(&settings.outgoing)?;
            info!("Searching index '{}' at {}", settings.index.name, settings.index.url);
            Arc::new(MeiliClient::new(client, &settings.index))
        }
        IndexEngine::Tantivy => embedded_index(&settings).await?,
    };

    let backend = IndexBackend::new(index);
    let app = gateway::create_router(Arc::new(backend), &settings.core.allowed_origin)?;

    gateway::serve(app, &settings.core).await
}
