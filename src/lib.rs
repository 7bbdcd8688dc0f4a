//! track-search: a CSV loader and two `/search` gateways in front of an
//! index of tracks, either a Meilisearch server or an embedded tantivy index.
//!
//! - `track-loader` reads the track file and submits it to the index.
//! - `track-core` answers `/search` from the index.
//! - `track-proxy` answers `/search` by forwarding to `track-core`.

pub mod config;
pub mod gateway;
pub mod index;
pub mod loader;
pub mod network;

pub use config::Settings;
pub use index::{Document, MeiliClient, SearchIndex, TantivyIndex};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber used by every binary.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
