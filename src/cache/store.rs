//! Cache Store Module
//!
//! Response cache combining HashMap storage with an expiry index for TTL
//! expiration and size-bounded eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStats, CachedResponse, ExpiryIndex};

/// Cache store shared between request handlers and the sweep task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Cache Store ==
/// In-memory response cache with TTL expiry and an optional entry bound.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry>,
    /// Keys ordered by expiry
    expiry: ExpiryIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime of stored entries
    ttl: Duration,
    /// Maximum number of entries, None = unbounded
    max_entries: Option<usize>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `ttl` - Lifetime applied by `put`
    /// * `max_entries` - Optional upper bound on the number of entries
    pub fn new(ttl: Duration, max_entries: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            expiry: ExpiryIndex::new(),
            stats: CacheStats::new(),
            ttl,
            max_entries,
        }
    }

    /// Wraps the store for sharing across tasks.
    pub fn into_shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    /// Configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the payload stored under `key` if it has not expired.
    ///
    /// An expired entry found here is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<CachedResponse> {
        self.get_at(key, Instant::now())
    }

    pub(super) fn get_at(&mut self, key: &str, now: Instant) -> Option<CachedResponse> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let payload = entry.payload.clone();
                self.stats.record_hit();
                return Some(payload);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        None
    }

    // == Put ==
    /// Stores `payload` under `key` with the configured TTL.
    pub fn put(&mut self, key: String, payload: CachedResponse) {
        let ttl = self.ttl;
        self.put_at(key, payload, Instant::now(), ttl);
    }

    /// Stores `payload` under `key` expiring after `ttl`.
    ///
    /// Replaces any existing entry for `key`. When inserting a new key would
    /// exceed the size bound, the entries closest to expiry are evicted first.
    pub fn put_with_ttl(&mut self, key: String, payload: CachedResponse, ttl: Duration) {
        self.put_at(key, payload, Instant::now(), ttl);
    }

    pub(super) fn put_at(
        &mut self,
        key: String,
        payload: CachedResponse,
        now: Instant,
        ttl: Duration,
    ) {
        if self.remove_entry(&key).is_none() {
            self.evict_for_insert();
        }

        let entry = CacheEntry::new(payload, now, ttl);
        self.expiry.insert(&key, entry.expires_at);
        self.entries.insert(key, entry);

        self.stats.record_store();
        self.stats.set_total_entries(self.entries.len());
    }

    /// Makes room for one new entry. Returns the number of entries evicted.
    fn evict_for_insert(&mut self) -> usize {
        let Some(max) = self.max_entries else {
            return 0;
        };

        let mut evicted = 0;
        while self.entries.len() >= max.max(1) {
            match self.expiry.pop_soonest() {
                Some(key) => {
                    self.entries.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }

        if evicted > 0 {
            self.stats.record_evictions(evicted);
            tracing::info!("Cleaned {} old cache entries", evicted);
        }
        evicted
    }

    // == Sweep ==
    /// Removes every expired entry. Returns the number of entries removed.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub(super) fn sweep_at(&mut self, now: Instant) -> usize {
        let expired = self.expiry.pop_expired(now);
        for key in &expired {
            self.entries.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.expiry.remove(key, entry.expires_at);
        Some(entry)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns true if an entry is held for `key`, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
