// Re-export modules
pub mod cache;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod fetchers;
pub mod pages;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use cache::{FileStorage, MemoryStorage, SnapshotCache, Storage};
pub use config::ClientConfig;
pub use controller::{ContentController, ContentSource, ContentView, FetchStatus};
pub use document::{Node, NodeId, NodeKind, Page};
pub use error::{FetchError, FetchErrorKind};
pub use fetchers::{ContentFetcher, HttpTransport, Reachability};
pub use results::FetchOutcome;

use std::path::PathBuf;

/// Controller wired to the HTTP transport and the file-backed snapshot
pub type DefaultController = ContentController<ContentFetcher<HttpTransport, FileStorage>>;

/// Builder for a production [`ContentController`]
pub struct ContentClient {
    config: ClientConfig,
    reachability: Reachability,
}

impl ContentClient {
    /// Create a new builder fetching from `endpoint`
    pub fn new(endpoint: &str) -> Self {
        Self {
            config: ClientConfig::new(endpoint),
            reachability: Reachability::default(),
        }
    }

    /// Create a new builder from a complete configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            reachability: Reachability::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Override the endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = endpoint.to_string();
        self
    }

    /// Override the snapshot directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = Some(dir.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = Some(timeout_seconds);
        self
    }

    /// Share a connectivity flag with the fetcher
    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = reachability;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate the configuration and assemble the controller
    pub fn build(self) -> Result<DefaultController, Box<dyn std::error::Error>> {
        self.config.validate()?;

        let transport = HttpTransport::new(&self.config)?;
        let storage = FileStorage::new(self.config.resolved_cache_dir());
        let cache = SnapshotCache::with_key(storage, self.config.cache_key.clone());

        ::log::debug!(
            "Content client for {} caching under {}",
            self.config.endpoint,
            cache.storage().dir().display()
        );

        let fetcher = ContentFetcher::new(self.config.endpoint, transport, cache)
            .with_reachability(self.reachability);
        Ok(ContentController::new(fetcher))
    }
}
