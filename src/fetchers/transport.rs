use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Status and body of an HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// `None` when no body was read (non-2xx responses)
    pub body: Option<Vec<u8>>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: Some(body.into()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Ways a request can fail before a usable response arrives
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built from the URL
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No connection to the server (DNS, refused, reset, timeout)
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The response started but its body could not be read
    #[error("response body unavailable: {0}")]
    NoBody(String),

    /// The server answered but no usable response came of it (redirect loop,
    /// malformed HTTP)
    #[error("unusable response: {0}")]
    Protocol(String),
}

/// Sends a single GET and hands back status and body
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Shared connectivity flag owned by the host platform.
///
/// When it reports offline the fetcher does not touch the network at all.
#[derive(Debug, Clone)]
pub struct Reachability(Arc<AtomicBool>);

impl Reachability {
    pub fn online() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn offline() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for Reachability {
    fn default() -> Self {
        Self::online()
    }
}
