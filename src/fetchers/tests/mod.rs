//! Test doubles shared by the fetcher and controller tests


use crate::cache::Storage;
use crate::fetchers::transport::{RawResponse, Transport, TransportError};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};
use url::Url;

/// What the scripted transport does on one call
pub(crate) enum Step {
    Respond(RawResponse),
    Fail(TransportError),
}

/// Transport that replays a fixed script and counts calls.
///
/// With a gate, every call parks until the test hands out a permit.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
    entered: Arc<Notify>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
            gate: None,
            entered: Arc::new(Notify::new()),
        }
    }

    pub(crate) fn gated(steps: Vec<Step>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(steps)
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Resolves once a call has reached the transport
    pub(crate) fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    fn next_step(&self) -> Step {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::Fail(TransportError::Unreachable("script exhausted".into())))
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, _url: &Url) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        match self.next_step() {
            Step::Respond(response) => Ok(response),
            Step::Fail(err) => Err(err),
        }
    }
}

/// Storage whose writes always fail and which never holds anything
pub(crate) struct BrokenStorage;

impl Storage for BrokenStorage {
    async fn read(&self, _key: &str) -> io::Result<Option<Vec<u8>>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"))
    }

    async fn write(&self, _key: &str, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "write denied"))
    }

    async fn delete(&self, _key: &str) -> io::Result<()> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }
}

pub(crate) const ENDPOINT: &str = "https://content.example.com/v1/document";

pub(crate) fn ok_json(json: &str) -> Step {
    Step::Respond(RawResponse::ok(json.as_bytes().to_vec()))
}

pub(crate) fn unreachable() -> Step {
    Step::Fail(TransportError::Unreachable("connection refused".into()))
}

pub(crate) const DOC_X: &str = r#"{
    "type": "page",
    "title": "X",
    "items": [
        {"type": "text", "title": "x1"},
        {"type": "page", "title": "X2", "items": [{"type": "text", "title": "x2"}]}
    ]
}"#;

pub(crate) const DOC_Y: &str = r#"{
    "type": "section",
    "title": "Y",
    "items": [
        {"type": "page", "title": "Y1", "items": [
            {"type": "image", "title": "y", "src": "https://example.com/y.png"}
        ]}
    ]
}"#;
