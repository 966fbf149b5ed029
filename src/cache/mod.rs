//! Cache Module
//!
//! Provides the in-memory response cache with TTL expiration and
//! size-bounded eviction.

mod entry;
mod expiry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedResponse, MAX_ENTRY_TTL};
pub use expiry::ExpiryIndex;
pub use key::KeyPolicy;
pub use stats::CacheStats;
pub use store::{CacheStore, SharedCache};
