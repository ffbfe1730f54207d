use crate::document::{Node, Page};
use crate::pages::pages;
use crate::results::FetchOutcome;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Title shown while no document is held
pub const PLACEHOLDER_TITLE: &str = "Fetching Content";

/// Anything that can run the fetch pipeline for the controller
pub trait ContentSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send;

    fn clear_cache(&self) -> impl Future<Output = ()> + Send;
}

/// What a call to [`ContentController::fetch`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Fresh document installed
    Fresh,
    /// Cached document installed, offline flag raised
    Stale,
    /// Nothing installed, error message set
    Failed,
    /// Another fetch was running; this call did nothing
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct ControllerState {
    document: Option<Node>,
    error_message: Option<String>,
    is_offline: bool,
    current_page_index: usize,
}

impl ControllerState {
    fn pages(&self) -> Vec<Page> {
        self.document.as_ref().map(pages).unwrap_or_default()
    }

    fn clamp_page_index(&mut self) {
        let count = self.pages().len();
        self.current_page_index = self.current_page_index.min(count.saturating_sub(1));
    }
}

/// Everything the presentation layer reads, captured at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct ContentView {
    pub pages: Vec<Page>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub is_offline: bool,
    pub current_page_index: usize,
    pub navigation_title: String,
}

/// Owns the current document and drives fetches.
///
/// At most one fetch runs at a time: a `fetch` or `retry` issued while one is
/// in flight is ignored and returns [`FetchStatus::AlreadyInFlight`].
/// Pages are recomputed from the document on every read.
pub struct ContentController<S> {
    source: S,
    state: Mutex<ControllerState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the fetch ends, even if its future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: ContentSource> ContentController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ControllerState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pipeline once and install its outcome
    pub async fn fetch(&self) -> FetchStatus {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            ::log::debug!("Fetch already in flight, ignoring request");
            return FetchStatus::AlreadyInFlight;
        }
        let _in_flight = InFlight(&self.in_flight);

        let outcome = self.source.fetch().await;

        let mut state = self.state.lock().await;
        let status = match outcome {
            FetchOutcome::Fresh(document) => {
                state.document = Some(document);
                state.error_message = None;
                state.is_offline = false;
                FetchStatus::Fresh
            }
            FetchOutcome::Stale { document, cause } => {
                ::log::warn!("Showing cached content: {}", cause);
                state.document = Some(document);
                state.error_message = None;
                state.is_offline = true;
                FetchStatus::Stale
            }
            FetchOutcome::Failure(err) => {
                ::log::error!("Failed to fetch content: {}", err);
                state.error_message = Some(format!("Failed to fetch content: {}", err));
                FetchStatus::Failed
            }
        };
        state.clamp_page_index();
        status
    }

    /// User-initiated retry; same guard as [`fetch`](Self::fetch)
    pub async fn retry(&self) -> FetchStatus {
        self.fetch().await
    }

    /// Drop the persisted snapshot; the document on screen is kept
    pub async fn clear_cache(&self) {
        self.source.clear_cache().await;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn document(&self) -> Option<Node> {
        self.state.lock().await.document.clone()
    }

    pub async fn pages(&self) -> Vec<Page> {
        self.state.lock().await.pages()
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error_message.clone()
    }

    pub async fn is_offline(&self) -> bool {
        self.state.lock().await.is_offline
    }

    pub async fn current_page_index(&self) -> usize {
        self.state.lock().await.current_page_index
    }

    /// Move to page `index`; returns false and stays put if it does not exist
    pub async fn select_page(&self, index: usize) -> bool {
        let mut state = self.state.lock().await;
        if index < state.pages().len() {
            state.current_page_index = index;
            true
        } else {
            false
        }
    }

    pub async fn navigation_title(&self) -> String {
        let state = self.state.lock().await;
        navigation_title(&state, &state.pages())
    }

    pub async fn view(&self) -> ContentView {
        let state = self.state.lock().await;
        let pages = state.pages();
        ContentView {
            navigation_title: navigation_title(&state, &pages),
            is_loading: self.is_loading(),
            error_message: state.error_message.clone(),
            is_offline: state.is_offline,
            current_page_index: state.current_page_index,
            pages,
        }
    }
}

fn navigation_title(state: &ControllerState, pages: &[Page]) -> String {
    match (&state.document, pages.get(state.current_page_index)) {
        (Some(_), Some(page)) => page.title.clone(),
        (Some(document), None) => document.title().to_string(),
        (None, _) => PLACEHOLDER_TITLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStorage, SnapshotCache};
    use crate::document;
    use crate::fetchers::ContentFetcher;
    use crate::fetchers::tests::{
        DOC_X, DOC_Y, ENDPOINT, ScriptedTransport, Step, ok_json, unreachable,
    };
    use crate::fetchers::transport::RawResponse;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    type TestController = ContentController<ContentFetcher<ScriptedTransport, MemoryStorage>>;

    fn controller(steps: Vec<Step>) -> TestController {
        ContentController::new(ContentFetcher::new(
            ENDPOINT,
            ScriptedTransport::new(steps),
            SnapshotCache::new(MemoryStorage::new()),
        ))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let controller = controller(vec![]);
        let view = controller.view().await;

        assert!(view.pages.is_empty());
        assert!(!view.is_loading);
        assert_eq!(view.error_message, None);
        assert!(!view.is_offline);
        assert_eq!(view.current_page_index, 0);
        assert_eq!(view.navigation_title, PLACEHOLDER_TITLE);
    }

    #[tokio::test]
    async fn test_fresh_fetch_installs_document() {
        let controller = controller(vec![ok_json(DOC_X)]);
        assert_eq!(controller.fetch().await, FetchStatus::Fresh);

        let view = controller.view().await;
        let titles: Vec<_> = view.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["X", "X2"]);
        assert_eq!(view.navigation_title, "X");
        assert!(!view.is_offline);
        assert_eq!(view.error_message, None);
    }

    #[tokio::test]
    async fn test_stale_fetch_sets_offline_flag_without_error() {
        let controller = controller(vec![ok_json(DOC_X), unreachable()]);
        controller.fetch().await;

        assert_eq!(controller.retry().await, FetchStatus::Stale);
        assert!(controller.is_offline().await);
        assert_eq!(controller.error_message().await, None);
        assert_eq!(
            controller.document().await,
            Some(document::decode(DOC_X.as_bytes()).unwrap())
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_document() {
        let controller = controller(vec![ok_json(DOC_X)]);
        controller.fetch().await;
        controller.clear_cache().await;

        assert_eq!(controller.fetch().await, FetchStatus::Failed);
        assert_eq!(
            controller.error_message().await.as_deref(),
            Some("Failed to fetch content: No internet connection")
        );
        assert_eq!(controller.pages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_without_any_document() {
        let controller = controller(vec![Step::Respond(RawResponse::status(500))]);

        assert_eq!(controller.fetch().await, FetchStatus::Failed);
        let view = controller.view().await;
        assert!(view.pages.is_empty());
        assert_eq!(
            view.error_message.as_deref(),
            Some("Failed to fetch content: Server error with status code: 500")
        );
        assert_eq!(view.navigation_title, PLACEHOLDER_TITLE);
    }

    #[tokio::test]
    async fn test_fresh_fetch_after_stale_clears_flags() {
        let controller = controller(vec![ok_json(DOC_X), unreachable(), ok_json(DOC_Y)]);
        controller.fetch().await;
        controller.fetch().await;
        assert!(controller.is_offline().await);

        assert_eq!(controller.retry().await, FetchStatus::Fresh);
        assert!(!controller.is_offline().await);
        assert_eq!(controller.navigation_title().await, "Y1");
    }

    #[tokio::test]
    async fn test_pages_follow_the_current_document() {
        let controller = controller(vec![ok_json(DOC_X), ok_json(DOC_Y)]);
        controller.fetch().await;
        assert_eq!(controller.pages().await.len(), 2);

        controller.fetch().await;
        let pages = controller.pages().await;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Y1");
    }

    #[tokio::test]
    async fn test_select_page_and_clamp_on_new_document() {
        let controller = controller(vec![ok_json(DOC_X), ok_json(DOC_Y)]);
        controller.fetch().await;

        assert!(controller.select_page(1).await);
        assert!(!controller.select_page(2).await);
        assert_eq!(controller.current_page_index().await, 1);
        assert_eq!(controller.navigation_title().await, "X2");

        controller.fetch().await;
        assert_eq!(controller.current_page_index().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_is_ignored() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = ScriptedTransport::gated(vec![ok_json(DOC_X), ok_json(DOC_Y)], gate.clone());
        let entered = transport.entered();
        let controller = Arc::new(ContentController::new(ContentFetcher::new(
            ENDPOINT,
            transport,
            SnapshotCache::new(MemoryStorage::new()),
        )));

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.fetch().await }
        });

        entered.notified().await;
        assert!(controller.is_loading());
        assert!(controller.view().await.is_loading);
        assert_eq!(controller.fetch().await, FetchStatus::AlreadyInFlight);
        assert_eq!(controller.retry().await, FetchStatus::AlreadyInFlight);

        gate.add_permits(1);
        assert_eq!(first.await.unwrap(), FetchStatus::Fresh);
        assert_eq!(controller.source().transport().calls(), 1);
        assert!(!controller.is_loading());
        assert_eq!(controller.navigation_title().await, "X");
    }

    #[tokio::test]
    async fn test_fetch_allowed_again_after_completion() {
        let controller = controller(vec![unreachable(), ok_json(DOC_Y)]);
        assert_eq!(controller.fetch().await, FetchStatus::Failed);
        assert_eq!(controller.retry().await, FetchStatus::Fresh);
        assert_eq!(controller.source().transport().calls(), 2);
    }
}
