use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError};

use store::QueryKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

type KeyLock = Arc<Mutex<()>>;

/// Per-key locks so concurrent identical queries share one fetch.
///
/// The holder of a key's guard fetches and fills the cache; later waiters
/// re-check the cache once they acquire it. A key's lock is forgotten when its
/// last guard is released with nobody waiting.
#[derive(Default)]
pub struct QueryCoalescer {
    inflight: SyncMutex<HashMap<QueryKey, KeyLock>>,
}

/// Held while fetching one key.
pub struct InflightGuard<'a> {
    coalescer: &'a QueryCoalescer,
    key: QueryKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl QueryCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<QueryKey, KeyLock>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn acquire(&self, key: &QueryKey) -> InflightGuard<'_> {
        let lock = Arc::clone(
            self.map()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        InflightGuard {
            coalescer: self,
            key: key.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of keys with a holder or waiters.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.coalescer.map();
        // One reference in the map, one in our guard: nobody else is waiting.
        let idle = map
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 2);
        if idle {
            map.remove(&self.key);
        }
        self.guard.take();
    }
}
