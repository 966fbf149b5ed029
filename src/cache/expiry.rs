//! Expiry Index Module
//!
//! Orders cache keys by expiry time for size-based eviction and sweeping.

use std::collections::BTreeSet;
use std::time::Instant;

// == Expiry Index ==
/// Tracks keys ordered by the instant they expire.
///
/// The first element is always the entry that expires soonest. Ties on the
/// same instant are broken by key so every key appears at most once.
#[derive(Debug, Default)]
pub struct ExpiryIndex {
    order: BTreeSet<(Instant, String)>,
}

impl ExpiryIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            order: BTreeSet::new(),
        }
    }

    // == Insert ==
    /// Records that `key` expires at `expires_at`.
    ///
    /// Callers replacing an entry must `remove` its previous expiry first.
    pub fn insert(&mut self, key: &str, expires_at: Instant) {
        self.order.insert((expires_at, key.to_string()));
    }

    // == Remove ==
    /// Forgets `key` at the given expiry.
    pub fn remove(&mut self, key: &str, expires_at: Instant) -> bool {
        self.order.remove(&(expires_at, key.to_string()))
    }

    // == Pop Soonest ==
    /// Removes and returns the key that expires first.
    pub fn pop_soonest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Pop Expired ==
    /// Removes and returns every key whose expiry is at or before `now`.
    pub fn pop_expired(&mut self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        while let Some((expires_at, _)) = self.order.first() {
            if *expires_at > now {
                break;
            }
            if let Some((_, key)) = self.order.pop_first() {
                expired.push(key);
            }
        }
        expired
    }

    // == Peek Soonest ==
    /// Returns the key that expires first without removing it.
    pub fn peek_soonest(&self) -> Option<&str> {
        self.order.first().map(|(_, key)| key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
