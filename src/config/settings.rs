//! Settings structures for track-search configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure matching tracks.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub index: IndexSettings,
    pub outgoing: OutgoingSettings,
    pub loader: LoaderSettings,
    pub core: GatewaySettings,
    pub proxy: ProxySettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (TRACKS_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("TRACKS_INDEX_URL") {
            self.index.url = val;
        }
        if let Ok(val) = std::env::var("TRACKS_INDEX_API_KEY") {
            self.index.api_key = Some(val).filter(|k| !k.is_empty());
        }
        if let Ok(val) = std::env::var("TRACKS_INDEX_ENGINE") {
            match val.as_str() {
                "meilisearch" => self.index.engine = IndexEngine::Meilisearch,
                "tantivy" => self.index.engine = IndexEngine::Tantivy,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("TRACKS_INDEX_NAME") {
            self.index.name = val;
        }
        if let Ok(val) = std::env::var("TRACKS_CSV_PATH") {
            self.loader.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TRACKS_CORE_PORT") {
            if let Ok(port) = val.parse() {
                self.core.port = port;
            }
        }
        if let Ok(val) = std::env::var("TRACKS_PROXY_PORT") {
            if let Ok(port) = val.parse() {
                self.proxy.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("TRACKS_PROXY_UPSTREAM") {
            self.proxy.upstream_url = val;
        }
    }
}

/// Search index connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Which index implementation backs the loader and the core gateway
    pub engine: IndexEngine,
    /// Base URL of the Meilisearch instance
    pub url: String,
    /// Bearer key sent with every request (none = unauthenticated)
    pub api_key: Option<String>,
    /// Index uid
    pub name: String,
    /// Primary key attribute of submitted documents
    pub primary_key: String,
    /// Embedded index settings, used when `engine` is `tantivy`
    pub embedded: EmbeddedSettings,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            engine: IndexEngine::default(),
            url: "http://127.0.0.1:7700".to_string(),
            api_key: Some("masterKey".to_string()),
            name: "tracks".to_string(),
            primary_key: "track_id".to_string(),
            embedded: EmbeddedSettings::default(),
        }
    }
}

/// Index implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexEngine {
    /// External Meilisearch server over HTTP
    #[default]
    Meilisearch,
    /// In-process tantivy index on local disk
    Tantivy,
}

/// Embedded tantivy index settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddedSettings {
    /// Index directory (none = in memory)
    pub path: Option<PathBuf>,
    /// Maximum hits per search
    pub search_limit: usize,
    /// Levenshtein distance of the fuzzy title match
    pub fuzzy_distance: u8,
    /// Indexing memory budget in bytes
    pub writer_heap_bytes: usize,
}

impl Default for EmbeddedSettings {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("./../store/index")),
            search_limit: 50,
            fuzzy_distance: 2,
            writer_heap_bytes: 50_000_000,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds (none = wait as long as the upstream takes)
    pub request_timeout: Option<f64>,
    /// Pool max size
    pub pool_maxsize: usize,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: None,
            pool_maxsize: 20,
        }
    }
}

/// CSV loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Input file
    pub path: PathBuf,
    /// Field delimiter, must be a single ASCII character
    pub delimiter: char,
    /// Skip the first row
    pub has_headers: bool,
    /// Block until the index reports the addition task as finished
    pub wait_for_task: bool,
    /// Delay between task status polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Give up waiting for the task after this many seconds (none = never)
    pub task_timeout: Option<f64>,
}

impl LoaderSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout.map(Duration::from_secs_f64)
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./../store/raw/tracks.csv"),
            delimiter: ',',
            has_headers: false,
            wait_for_task: true,
            poll_interval_ms: 100,
            task_timeout: None,
        }
    }
}

/// Listener and CORS settings for one gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// The single origin allowed to make cross-origin requests
    pub allowed_origin: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "127.0.0.1".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

/// Proxy gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub server: GatewaySettings,
    /// Base URL of the core gateway
    pub upstream_url: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            server: GatewaySettings {
                port: 8080,
                allowed_origin: "http://localhost:8081".to_string(),
                ..Default::default()
            },
            upstream_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}
