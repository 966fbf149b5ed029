//! Cache Entry Module
//!
//! Defines the cached upstream payload and its expiry metadata.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};

/// Upper bound on an entry's lifetime when the requested TTL overflows.
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cached Response ==
/// An upstream response kept verbatim for replay.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Upstream status (only 200 is ever stored)
    pub status: StatusCode,
    /// Upstream `Content-Type`, if it sent one
    pub content_type: Option<HeaderValue>,
    /// Raw upstream body
    pub body: Bytes,
}

impl CachedResponse {
    /// Creates a payload for a successful upstream response.
    pub fn ok(content_type: Option<HeaderValue>, body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type,
            body: body.into(),
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with payload and expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub payload: CachedResponse,
    /// Insertion time
    pub created_at: Instant,
    /// Instant at which the entry becomes stale
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// A `ttl` too large to represent is clamped to [`MAX_ENTRY_TTL`].
    pub fn new(payload: CachedResponse, now: Instant, ttl: Duration) -> Self {
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(MAX_ENTRY_TTL))
            .unwrap_or(now);
        Self {
            payload,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` reaches `expires_at`, so a zero TTL
    /// entry is never served.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, saturating at zero.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
