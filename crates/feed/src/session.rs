// ABOUTME: Async driver for FeedController: runs dispatched fetches on tokio and applies their outcomes.
// ABOUTME: Settlements flow back through one channel so each is applied atomically, in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::{FeedController, FeedEvent, FeedState, FetchRequest};
use crate::error::FetchFailure;
use crate::fetcher::PageFetcher;
use crate::models::FeedConfig;

/// Drives a [`FeedController`] with a real [`PageFetcher`].
///
/// Fetches run concurrently on the tokio runtime, but their outcomes are only
/// applied when the owner calls [`FeedSession::settle_next`], so the state is
/// never touched from another task. In-flight requests are never cancelled;
/// results for a superseded query are dropped by the controller.
pub struct FeedSession<F> {
    controller: FeedController,
    fetcher: Arc<F>,
    settled_tx: mpsc::UnboundedSender<FeedEvent>,
    settled_rx: mpsc::UnboundedReceiver<FeedEvent>,
    in_flight: usize,
    dispatched: u64,
}

impl<F> FeedSession<F>
where
    F: PageFetcher + 'static,
{
    pub fn new(fetcher: F, config: FeedConfig) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            controller: FeedController::new(config),
            fetcher: Arc::new(fetcher),
            settled_tx,
            settled_rx,
            in_flight: 0,
            dispatched: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        self.controller.state()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches spawned but not yet applied, including ones that will turn out stale.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Total number of fetches dispatched by this session.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Resets the feed to `query` and fetches its first page.
    pub fn start(&mut self, query: impl Into<String>) -> bool {
        self.submit(FeedEvent::QueryChanged(query.into()))
    }

    pub fn load_more(&mut self) -> bool {
        self.submit(FeedEvent::LoadMoreRequested)
    }

    pub fn retry(&mut self) -> bool {
        self.submit(FeedEvent::RetryRequested)
    }

    /// Applies an external event. Returns true if it dispatched a fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, event: FeedEvent) -> bool {
        match self.controller.handle(event) {
            Some(fetch) => {
                self.spawn_fetch(fetch);
                true
            }
            None => false,
        }
    }

    /// Waits for the next fetch to settle and applies it.
    /// Returns false without waiting when nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        // The session keeps a sender alive, so recv only yields None if the
        // channel is closed, which it never is while `self` exists.
        let Some(event) = self.settled_rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        if let Some(fetch) = self.controller.handle(event) {
            self.spawn_fetch(fetch);
        }
        true
    }

    /// Applies every outstanding fetch, stale ones included.
    pub async fn settle_all(&mut self) {
        while self.settle_next().await {}
    }

    fn spawn_fetch(&mut self, fetch: FetchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let settled_tx = self.settled_tx.clone();
        self.in_flight += 1;
        self.dispatched += 1;
        debug!(
            generation = fetch.generation,
            page_index = fetch.request.page_index,
            "spawning page fetch"
        );

        tokio::spawn(async move {
            let request = fetch.request.clone();
            let task = tokio::spawn(async move { fetcher.fetch(&request).await });
            // A panicking fetcher still has to settle, or the feed stays Loading forever.
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(FetchFailure::transport(format!("fetch task failed: {}", err))),
            };
            // The receiver only goes away with the session itself.
            let _ = settled_tx.send(FeedEvent::FetchSettled {
                generation: fetch.generation,
                page_index: fetch.request.page_index,
                outcome,
            });
        });
    }
}
