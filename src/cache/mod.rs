pub mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::document::{self, Node};
use crate::error::CacheError;

/// Default slot name for the persisted document
pub const DEFAULT_CACHE_KEY: &str = "cached_content";

/// Single-slot store holding the last successfully fetched document.
///
/// Absence and corruption look the same to callers: `load` returns `None`
/// in both cases and logs the reason.
#[derive(Debug)]
pub struct SnapshotCache<S> {
    storage: S,
    key: String,
}

impl<S: Storage> SnapshotCache<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CACHE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace the snapshot with `node`
    pub async fn save(&self, node: &Node) -> Result<(), CacheError> {
        let result = match document::encode(node) {
            Ok(bytes) => self
                .storage
                .write(&self.key, &bytes)
                .await
                .map_err(CacheError::from),
            Err(e) => Err(CacheError::from(e)),
        };

        match &result {
            Ok(()) => ::log::info!("Content saved to cache"),
            Err(e) => ::log::error!("Failed to save content to cache: {}", e),
        }
        result
    }

    /// The saved snapshot, or `None` if nothing usable is stored
    pub async fn load(&self) -> Option<Node> {
        let bytes = match self.storage.read(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                ::log::warn!("No cached content found");
                return None;
            }
            Err(e) => {
                ::log::error!("Failed to read cached content: {}", e);
                return None;
            }
        };

        match document::decode(&bytes) {
            Ok(node) => {
                ::log::info!("Content loaded from cache");
                Some(node)
            }
            Err(e) => {
                ::log::error!("Failed to load content from cache: {}", e);
                None
            }
        }
    }

    /// Remove the snapshot. Clearing an empty cache succeeds.
    pub async fn clear(&self) {
        match self.storage.delete(&self.key).await {
            Ok(()) => ::log::info!("Cache cleared"),
            Err(e) => ::log::error!("Failed to clear cache: {}", e),
        }
    }
}
