//! Search session: the contract between the fetcher and a UI presenter.
//!
//! # Design
//! A UI submits raw queries; the session reports `on_load_started`, runs the
//! fetch on its own worker thread, then reports `on_results_ready` or
//! `on_load_failed`. Each submission gets a monotonically increasing
//! `RequestId`, and only the latest request may reach the presenter: a slow
//! older fetch that finishes after a newer one was submitted is dropped.
//!
//! The latest id lives behind a mutex that is held while a result is
//! delivered, so once `submit_search` or `invalidate` returns, no older
//! request can still be delivered. Presenter callbacks must therefore not call
//! back into the session on the delivering thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::types::Book;

pub type RequestId = u64;

/// Receives the outcome of searches. Called from worker threads.
pub trait Presenter: Send + Sync + 'static {
    fn on_load_started(&self);
    fn on_results_ready(&self, books: Vec<Book>);
    fn on_load_failed(&self, reason: FetchError);
}

/// Anything that can turn a raw query into books.
pub trait BookSource: Send + Sync + 'static {
    fn search(&self, query: &str) -> Result<Vec<Book>, FetchError>;
}

impl BookSource for Fetcher {
    fn search(&self, query: &str) -> Result<Vec<Book>, FetchError> {
        Fetcher::search(self, query)
    }
}

/// Host-side network check consulted before each fetch.
pub trait Connectivity: Send + Sync + 'static {
    fn is_connected(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// Connectivity check for hosts that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_connected(&self) -> bool {
        true
    }
}

struct Shared<S, P> {
    source: S,
    presenter: P,
    connectivity: Box<dyn Connectivity>,
    latest: Mutex<RequestId>,
}

impl<S: BookSource, P: Presenter> Shared<S, P> {
    fn latest(&self) -> MutexGuard<'_, RequestId> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, id: RequestId, outcome: Result<Vec<Book>, FetchError>) {
        let latest = self.latest();
        if *latest != id {
            log::debug!("dropping result of search {id}, superseded by {}", *latest);
            return;
        }
        match outcome {
            Ok(books) => self.presenter.on_results_ready(books),
            Err(reason) => self.presenter.on_load_failed(reason),
        }
    }
}

pub struct SearchSession<S, P> {
    shared: Arc<Shared<S, P>>,
}

impl<S: BookSource, P: Presenter> SearchSession<S, P> {
    pub fn new(source: S, presenter: P) -> Self {
        Self::with_connectivity(source, presenter, AssumeOnline)
    }

    pub fn with_connectivity(source: S, presenter: P, connectivity: impl Connectivity) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                presenter,
                connectivity: Box::new(connectivity),
                latest: Mutex::new(0),
            }),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.shared.presenter
    }

    /// Id of the most recently issued request, 0 before the first one.
    pub fn latest_request(&self) -> RequestId {
        *self.shared.latest()
    }

    /// Start a search for `query`, superseding any search still in flight.
    pub fn submit_search(&self, query: &str) -> SearchHandle {
        let id = {
            let mut latest = self.shared.latest();
            *latest += 1;
            *latest
        };

        if !self.shared.connectivity.is_connected() {
            log::warn!("search {id} not started: no network connectivity");
            self.shared.deliver(id, Err(FetchError::NoConnectivity));
            return SearchHandle { id, worker: None };
        }

        self.shared.presenter.on_load_started();

        let shared = Arc::clone(&self.shared);
        let query = query.to_string();
        let spawned = thread::Builder::new()
            .name(format!("books-search-{id}"))
            .spawn(move || {
                let outcome = shared.source.search(&query);
                shared.deliver(id, outcome);
            });

        match spawned {
            Ok(worker) => SearchHandle {
                id,
                worker: Some(worker),
            },
            Err(e) => {
                log::error!("could not start worker for search {id}: {e}");
                self.shared
                    .deliver(id, Err(FetchError::NetworkFailure(format!("worker spawn failed: {e}"))));
                SearchHandle { id, worker: None }
            }
        }
    }

    /// Mark every in-flight search stale so its result is never delivered.
    /// Call when the presenter detaches.
    pub fn invalidate(&self) {
        let mut latest = self.shared.latest();
        *latest += 1;
        log::debug!("session invalidated, pending searches up to {} dropped", *latest - 1);
    }
}

/// Handle to one submitted search.
#[derive(Debug)]
pub struct SearchHandle {
    id: RequestId,
    worker: Option<JoinHandle<()>>,
}

impl SearchHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Block until the worker has finished (and delivered, unless superseded).
    pub fn join(self) {
        if let Some(worker) = self.worker {
            if worker.join().is_err() {
                log::error!("search {} worker panicked", self.id);
            }
        }
    }
}
