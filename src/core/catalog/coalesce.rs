use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

type InflightMap<K, V> = HashMap<K, (u64, Shared<BoxFuture<'static, Option<V>>>)>;

/// At most one in-flight task per key. Callers that arrive while a task for
/// their key is running await that task instead of starting another one.
///
/// Tasks are spawned, so they run to completion even when every caller
/// stops waiting.
pub struct Coalescer<K, V> {
    inflight: Arc<Mutex<InflightMap<K, V>>>,
    next_ticket: AtomicU64,
}

impl<K, V> Default for Coalescer<K, V> {
    fn default() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: AtomicU64::new(0),
        }
    }
}

impl<K, V> Coalescer<K, V>
where
    K: Eq + Hash + Clone + Send + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the running task for `key`, or start one with `start`.
    ///
    /// Returns `None` only if the task panicked.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> Option<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let shared = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match inflight.get(&key) {
                Some((_, running)) => {
                    debug!("Joining in-flight task for {:?}", key);
                    running.clone()
                }
                None => {
                    let ticket = self.take_ticket();
                    let task = start();
                    let registry = Arc::clone(&self.inflight);
                    let task_key = key.clone();

                    let handle = tokio::spawn(async move {
                        let value = task.await;
                        let mut inflight = registry.lock().unwrap_or_else(PoisonError::into_inner);
                        if matches!(inflight.get(&task_key), Some((t, _)) if *t == ticket) {
                            inflight.remove(&task_key);
                        }
                        value
                    });

                    let running = async move {
                        match handle.await {
                            Ok(value) => Some(value),
                            Err(e) => {
                                warn!("Coalesced task failed: {}", e);
                                None
                            }
                        }
                    }
                    .boxed()
                    .shared();

                    inflight.insert(key, (ticket, running.clone()));
                    running
                }
            }
        };

        shared.await
    }

    /// Number of keys with a task currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn take_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::Relaxed)
    }
}
