use crate::document::DocumentError;

/// Failures of a content fetch, as seen by the controller.
///
/// The `Display` text is the message shown to the reader.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The configured endpoint is not a valid URL
    #[error("Invalid URL")]
    BadLocator(String),

    #[error("No data received")]
    NoResponseBody,

    #[error("Failed to decode data")]
    DecodeFailure(#[source] DocumentError),

    #[error("No internet connection")]
    Offline,

    #[error("Server error with status code: {status_code}")]
    ServerError { status_code: u16 },
}

/// Payload-free tag of a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    BadLocator,
    NoResponseBody,
    DecodeFailure,
    Offline,
    ServerError { status_code: u16 },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::BadLocator(_) => FetchErrorKind::BadLocator,
            FetchError::NoResponseBody => FetchErrorKind::NoResponseBody,
            FetchError::DecodeFailure(_) => FetchErrorKind::DecodeFailure,
            FetchError::Offline => FetchErrorKind::Offline,
            FetchError::ServerError { status_code } => FetchErrorKind::ServerError {
                status_code: *status_code,
            },
        }
    }
}

impl From<DocumentError> for FetchError {
    fn from(err: DocumentError) -> Self {
        FetchError::DecodeFailure(err)
    }
}

/// Failures writing or clearing the snapshot. Never surfaced past the fetcher.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode snapshot: {0}")]
    Encode(#[from] DocumentError),
}
