use crate::cache::{SnapshotCache, Storage};
use crate::controller::ContentSource;
use crate::document::{self, Node};
use crate::error::FetchError;
use crate::fetchers::transport::{Reachability, Transport, TransportError};
use crate::results::FetchOutcome;
use url::Url;

/// Retrieves the document from the endpoint and falls back to the snapshot
/// cache when that fails.
///
/// A successful fetch always replaces the snapshot; a failed snapshot write is
/// logged and does not affect the outcome. Any failure, not only `Offline`,
/// triggers the fallback. There are no retries at this level.
pub struct ContentFetcher<T, S> {
    endpoint: String,
    transport: T,
    cache: SnapshotCache<S>,
    reachability: Reachability,
}

impl<T: Transport, S: Storage> ContentFetcher<T, S> {
    pub fn new(endpoint: impl Into<String>, transport: T, cache: SnapshotCache<S>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            cache,
            reachability: Reachability::default(),
        }
    }

    /// Use a connectivity flag shared with the host
    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = reachability;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    pub fn reachability(&self) -> &Reachability {
        &self.reachability
    }

    /// Run the full pipeline: network first, snapshot second
    pub async fn fetch(&self) -> FetchOutcome {
        match self.fetch_from_network().await {
            Ok(node) => {
                // Outcome does not depend on the write; save() logs failures
                let _ = self.cache.save(&node).await;
                FetchOutcome::Fresh(node)
            }
            Err(err) => {
                ::log::warn!("Network error: {}, attempting to load from cache", err);
                match self.cache.load().await {
                    Some(document) => {
                        ::log::info!("Serving cached content after failed fetch");
                        FetchOutcome::Stale {
                            document,
                            cause: err,
                        }
                    }
                    None => FetchOutcome::Failure(err),
                }
            }
        }
    }

    /// One request to the endpoint, classified into [`FetchError`]
    pub async fn fetch_from_network(&self) -> Result<Node, FetchError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| FetchError::BadLocator(format!("{}: {}", self.endpoint, e)))?;

        if !self.reachability.is_online() {
            ::log::info!("Offline mode: skipping request to {}", url);
            return Err(FetchError::Offline);
        }

        ::log::info!("Fetching content from {}", url);
        let response = self.transport.get(&url).await.map_err(|e| match e {
            TransportError::InvalidRequest(msg) => FetchError::BadLocator(msg),
            TransportError::Unreachable(msg) => {
                ::log::debug!("Connectivity failure: {}", msg);
                FetchError::Offline
            }
            TransportError::NoBody(msg) => {
                ::log::debug!("Body read failure: {}", msg);
                FetchError::NoResponseBody
            }
            TransportError::Protocol(msg) => {
                ::log::warn!("Unusable response from {}: {}", self.endpoint, msg);
                FetchError::NoResponseBody
            }
        })?;

        if !response.is_success() {
            return Err(FetchError::ServerError {
                status_code: response.status,
            });
        }

        let body = match response.body {
            Some(body) if !body.is_empty() => body,
            _ => return Err(FetchError::NoResponseBody),
        };

        document::decode(&body).map_err(|e| {
            ::log::error!("Decoding error: {}", e);
            FetchError::DecodeFailure(e)
        })
    }
}

impl<T: Transport, S: Storage> ContentSource for ContentFetcher<T, S> {
    async fn fetch(&self) -> FetchOutcome {
        ContentFetcher::fetch(self).await
    }

    async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
