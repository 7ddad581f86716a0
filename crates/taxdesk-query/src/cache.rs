//! Keyed query cache with in-flight deduplication and invalidation.
//!
//! Each query key owns one cache slot: last data, last error, a status, and a
//! stale flag. A fresh success is served without running the loader; while a
//! fetch is in flight every concurrent caller joins it, so the loader runs at
//! most once per key at a time. Data stays fresh until explicitly invalidated
//! (no TTL). Observers subscribe to per-key snapshots over a watch channel.

use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

/// Identity of a cached query, e.g. `QueryKey("taxes")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(pub &'static str);

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Lifecycle of a cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Immutable per-key state published to observers on every transition.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub stale: bool,
    /// Bumped once per completed fetch, successful or not.
    pub epoch: u64,
}

#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The loader for this key failed. The previous success, if any, is kept
    /// in the slot but the error is what callers see.
    #[error("query {key} failed: {source}")]
    Loader {
        key: QueryKey,
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },

    /// The slot holds data of a different type than the caller asked for.
    #[error("query {key} holds a different data type")]
    TypeMismatch { key: QueryKey },
}

struct Slot {
    data: Option<Arc<dyn Any + Send + Sync>>,
    error: Option<QueryError>,
    status: QueryStatus,
    stale: bool,
    epoch: u64,
    updated_at: Option<Instant>,
    tx: watch::Sender<QuerySnapshot>,
}

impl Slot {
    fn new(key: QueryKey) -> Self {
        let (tx, _) = watch::channel(QuerySnapshot {
            key,
            status: QueryStatus::Idle,
            stale: false,
            epoch: 0,
        });
        Self {
            data: None,
            error: None,
            status: QueryStatus::Idle,
            stale: false,
            epoch: 0,
            updated_at: None,
            tx,
        }
    }

    fn publish(&self, key: QueryKey) {
        self.tx.send_replace(QuerySnapshot {
            key,
            status: self.status,
            stale: self.stale,
            epoch: self.epoch,
        });
    }
}

/// What a caller of [`QueryClient::fetch`] turned out to be.
enum Role {
    /// Fresh cached success; no fetch needed.
    Cached(Arc<dyn Any + Send + Sync>),
    /// A fetch is already in flight; join it.
    Waiter(watch::Receiver<QuerySnapshot>),
    /// This caller runs the loader.
    Leader,
}

/// Explicit, injectable query cache. Owned by the application root and passed
/// by reference to whichever component issues queries; the cache is the only
/// writer of its own slots.
///
/// The internal mutex is held only between awaits, never across one.
pub struct QueryClient {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the data for `key`, running `loader` only if there is no fresh
    /// cached success and no fetch already in flight.
    ///
    /// Concurrent callers of the same key all receive the result of the single
    /// underlying loader invocation. On failure the error is stored on the
    /// slot and returned; a previous success stays cached but is not silently
    /// served over the error.
    pub async fn fetch<T, E, F, Fut>(&self, key: QueryKey, loader: F) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        E: Error + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let role = {
            let mut slots = self.slots.lock().expect("query cache poisoned");
            let slot = slots.entry(key).or_insert_with(|| Slot::new(key));
            match slot.status {
                QueryStatus::Loading => Role::Waiter(slot.tx.subscribe()),
                QueryStatus::Success if !slot.stale => {
                    let data = slot.data.clone().ok_or(QueryError::TypeMismatch { key })?;
                    Role::Cached(data)
                }
                _ => {
                    slot.status = QueryStatus::Loading;
                    slot.publish(key);
                    Role::Leader
                }
            }
        };

        match role {
            Role::Cached(data) => {
                debug!(key = %key, "serving cached query data");
                downcast(key, data)
            }
            Role::Waiter(rx) => {
                debug!(key = %key, "joining in-flight fetch");
                self.join(key, rx).await
            }
            Role::Leader => {
                debug!(key = %key, "running query loader");
                let result = loader().await;
                self.complete(key, result)
            }
        }
    }

    /// Mark the slot for `key` stale and notify observers. The next fetch for
    /// the key re-runs its loader. Unknown keys are a no-op.
    pub fn invalidate(&self, key: QueryKey) {
        let mut slots = self.slots.lock().expect("query cache poisoned");
        if let Some(slot) = slots.get_mut(&key) {
            debug!(key = %key, "invalidating query");
            slot.stale = true;
            slot.publish(key);
        }
    }

    /// Run a write operation. The cache is not touched; after a successful
    /// mutation the caller issues the matching [`invalidate`](Self::invalidate).
    pub async fn mutate<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        op().await
    }

    /// Observer channel for `key`. The receiver sees a snapshot on every
    /// status or staleness transition.
    pub fn subscribe(&self, key: QueryKey) -> watch::Receiver<QuerySnapshot> {
        let mut slots = self.slots.lock().expect("query cache poisoned");
        let slot = slots.entry(key).or_insert_with(|| Slot::new(key));
        slot.tx.subscribe()
    }

    /// Current snapshot for `key` (Idle if the key has never been fetched).
    pub fn snapshot(&self, key: QueryKey) -> QuerySnapshot {
        let slots = self.slots.lock().expect("query cache poisoned");
        match slots.get(&key) {
            Some(slot) => slot.tx.borrow().clone(),
            None => QuerySnapshot {
                key,
                status: QueryStatus::Idle,
                stale: false,
                epoch: 0,
            },
        }
    }

    /// When the last fetch for `key` completed, if any.
    pub fn last_updated(&self, key: QueryKey) -> Option<Instant> {
        let slots = self.slots.lock().expect("query cache poisoned");
        slots.get(&key).and_then(|slot| slot.updated_at)
    }

    /// Store a completed fetch and notify observers.
    fn complete<T, E>(&self, key: QueryKey, result: Result<T, E>) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        E: Error + Send + Sync + 'static,
    {
        let mut slots = self.slots.lock().expect("query cache poisoned");
        let slot = slots
            .get_mut(&key)
            .expect("slot created before fetch started");
        slot.epoch += 1;
        slot.updated_at = Some(Instant::now());
        let out = match result {
            Ok(value) => {
                let value = Arc::new(value);
                slot.data = Some(value.clone());
                slot.error = None;
                slot.status = QueryStatus::Success;
                slot.stale = false;
                Ok(value)
            }
            Err(err) => {
                let err = QueryError::Loader {
                    key,
                    source: Arc::new(err),
                };
                slot.error = Some(err.clone());
                slot.status = QueryStatus::Error;
                Err(err)
            }
        };
        slot.publish(key);
        out
    }

    /// Wait for the in-flight fetch on `key` to settle and return its result.
    async fn join<T>(
        &self,
        key: QueryKey,
        mut rx: watch::Receiver<QuerySnapshot>,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
    {
        loop {
            // The sender lives in the slot map, so the channel cannot close
            // while the client is alive.
            let _ = rx
                .wait_for(|snap| snap.status != QueryStatus::Loading)
                .await;

            let outcome = {
                let slots = self.slots.lock().expect("query cache poisoned");
                let slot = slots.get(&key).expect("slot exists while joined");
                match slot.status {
                    QueryStatus::Success => slot.data.clone().map(Ok),
                    QueryStatus::Error => slot.error.clone().map(Err),
                    // Another fetch started in the gap; keep waiting.
                    _ => None,
                }
            };
            match outcome {
                Some(Ok(data)) => return downcast(key, data),
                Some(Err(err)) => return Err(err),
                None => continue,
            }
        }
    }
}

fn downcast<T: Send + Sync + 'static>(
    key: QueryKey,
    data: Arc<dyn Any + Send + Sync>,
) -> Result<Arc<T>, QueryError> {
    data.downcast::<T>()
        .map_err(|_| QueryError::TypeMismatch { key })
}
