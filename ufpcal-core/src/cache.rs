//! In-memory cache with per-entry expiry.
//!
//! Entries are only ever replaced wholesale. An expired entry is invisible to
//! `get` as soon as its deadline passes, and is physically removed either by
//! `purge_expired` or by the background sweeper.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::clock::{Clock, SystemClock};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe key/value store where every entry carries its own deadline.
///
/// Concurrent writers for the same key are allowed; the last `set` wins.
#[derive(Debug)]
pub struct TimedCache<K, V, C = SystemClock> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    clock: C,
}

impl<K, V> TimedCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K, V> Default for TimedCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TimedCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Return a clone of the value for `key` if it exists and has not expired.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.write().insert(key, Entry { value, expires_at });
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, C> TimedCache<K, V, C>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock,
{
    /// Spawn a task that purges expired entries every `every`.
    ///
    /// The task only holds a weak reference and stops on its first tick after
    /// the cache has been dropped. Must be called from within a tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + every;
            let mut ticker = tokio::time::interval_at(start, every);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.purge_expired();
                trace!(removed, remaining = cache.len(), "cache sweep");
            }
        })
    }
}
