//! Correlation of asynchronous replies with pending requests.
//!
//! A producer registers a key and suspends on a single-resolution completion
//! handle; whoever sees the matching reply resolves it. Entries are removed
//! when resolved, replaced, or timed out, so the map never grows unbounded.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::oneshot;

pub struct PendingReplies<K, V> {
    inner: Mutex<HashMap<K, oneshot::Sender<V>>>,
}

impl<K, V> Default for PendingReplies<K, V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> PendingReplies<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a reply for `key`, returning the receive side.
    /// A previous registration for the same key is dropped (its waiter sees
    /// a closed channel).
    pub fn register(&self, key: K) -> oneshot::Receiver<V> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().unwrap().insert(key, tx);
        rx
    }

    /// Deliver a reply. Returns false when nobody is waiting on `key`.
    /// The entry is removed either way; it can resolve at most once.
    pub fn resolve(&self, key: &K, value: V) -> bool {
        match self.inner.lock().unwrap().remove(key) {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    /// Remove a registration without resolving it (cancel).
    pub fn remove(&self, key: &K) {
        self.inner.lock().unwrap().remove(key);
    }

    /// Register, wait up to `timeout` for the reply, and clean up the entry
    /// regardless of outcome.
    pub async fn wait(&self, key: K, timeout: Duration) -> Option<V> {
        let rx = self.register(key.clone());
        let out = tokio::time::timeout(timeout, rx).await;
        self.remove(&key);
        match out {
            Ok(Ok(v)) => Some(v),
            _ => None,
        }
    }

    /// Number of unresolved registrations (diagnostics).
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
