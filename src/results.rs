use crate::document::Node;
use crate::error::FetchError;

/// Result of one run of the retrieve-then-fall-back pipeline
#[derive(Debug)]
pub enum FetchOutcome {
    /// Document retrieved from the network just now
    Fresh(Node),

    /// Live retrieval failed; document served from the cache
    Stale { document: Node, cause: FetchError },

    /// Live retrieval failed and no cached document exists
    Failure(FetchError),
}

impl FetchOutcome {
    /// The document carried by this outcome, if any
    pub fn document(&self) -> Option<&Node> {
        match self {
            FetchOutcome::Fresh(node) => Some(node),
            FetchOutcome::Stale { document, .. } => Some(document),
            FetchOutcome::Failure(_) => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, FetchOutcome::Stale { .. })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Fresh(_) => None,
            FetchOutcome::Stale { cause, .. } => Some(cause),
            FetchOutcome::Failure(err) => Some(err),
        }
    }
}
