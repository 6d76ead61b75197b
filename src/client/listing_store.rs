//! Process-wide cache for listing endpoints.
//!
//! Each key holds at most one fetch in flight. Consumers that ask while it is
//! running await the same shared future, and every state change is published
//! on a per-key `watch` channel.

use crate::error::AppResult;
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;

#[async_trait]
pub trait ListingFetcher<K, T>: Send + Sync {
    async fn fetch(&self, key: &K) -> AppResult<Vec<T>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState<T> {
    Empty,
    Loading,
    Populated(Arc<Vec<T>>),
    /// Last fetch failed; nothing is retried until the next `get` or `refresh`.
    Failed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing fetch failed: {0}")]
    Fetch(String),
}

type FetchOutput<T> = Result<Arc<Vec<T>>, String>;
type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutput<T>>>;

struct Entry<T> {
    in_flight: Option<SharedFetch<T>>,
    // bumped by every fetch start and invalidation; stale completions are ignored
    generation: u64,
    state: watch::Sender<ListingState<T>>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(ListingState::Empty);
        Self {
            in_flight: None,
            generation: 0,
            state,
        }
    }
}

struct Inner<K, T> {
    fetcher: Arc<dyn ListingFetcher<K, T>>,
    entries: Mutex<HashMap<K, Entry<T>>>,
}

impl<K, T> Inner<K, T> {
    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ListingStore<K, T> {
    inner: Arc<Inner<K, T>>,
}

impl<K, T> Clone for ListingStore<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> ListingStore<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new(fetcher: Arc<dyn ListingFetcher<K, T>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Cached items, or the result of the fetch this call starts or joins.
    pub async fn get(&self, key: &K) -> Result<Arc<Vec<T>>, ListingError> {
        let fetch = {
            let mut entries = self.inner.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            if let Some(fetch) = entry.in_flight.clone() {
                fetch
            } else {
                if let ListingState::Populated(items) = &*entry.state.borrow() {
                    return Ok(Arc::clone(items));
                }
                self.start_fetch(key, entry)
            }
        };

        fetch.await.map_err(ListingError::Fetch)
    }

    /// Fetch again whatever is cached. A fetch already in flight is joined.
    pub async fn refresh(&self, key: &K) -> Result<Arc<Vec<T>>, ListingError> {
        let fetch = {
            let mut entries = self.inner.lock();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            match entry.in_flight.clone() {
                Some(fetch) => fetch,
                None => self.start_fetch(key, entry),
            }
        };

        fetch.await.map_err(ListingError::Fetch)
    }

    /// Drop the cached value without fetching. A fetch still in flight
    /// completes for its callers but no longer updates the store.
    pub fn invalidate(&self, key: &K) {
        let mut entries = self.inner.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.generation += 1;
            entry.in_flight = None;
            entry.state.send_replace(ListingState::Empty);
        }
    }

    pub fn subscribe(&self, key: &K) -> watch::Receiver<ListingState<T>> {
        let mut entries = self.inner.lock();
        entries
            .entry(key.clone())
            .or_insert_with(Entry::new)
            .state
            .subscribe()
    }

    pub fn snapshot(&self, key: &K) -> ListingState<T>
    where
        T: Clone,
    {
        self.inner
            .lock()
            .get(key)
            .map(|entry| entry.state.borrow().clone())
            .unwrap_or(ListingState::Empty)
    }

    // Caller holds the entries lock.
    fn start_fetch(&self, key: &K, entry: &mut Entry<T>) -> SharedFetch<T> {
        entry.generation += 1;
        let generation = entry.generation;

        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        let fetch = async move {
            let result = inner
                .fetcher
                .fetch(&key)
                .await
                .map(Arc::new)
                .map_err(|e| e.to_string());
            Self::finish(&inner, &key, generation, &result);
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(fetch.clone());
        entry.state.send_replace(ListingState::Loading);

        // runs to completion even if every caller stops waiting
        tokio::spawn(fetch.clone());
        fetch
    }

    fn finish(inner: &Inner<K, T>, key: &K, generation: u64, result: &FetchOutput<T>) {
        let mut entries = inner.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation {
            log::debug!("Discarding stale listing fetch");
            return;
        }

        entry.in_flight = None;
        let state = match result {
            Ok(items) => ListingState::Populated(Arc::clone(items)),
            Err(message) => {
                log::warn!("Listing fetch failed: {message}");
                ListingState::Failed(message.clone())
            }
        };
        entry.state.send_replace(state);
    }
}
