//! Single-slot freshness cache.
//!
//! Tracks whether the in-memory date set is currently trustworthy. The
//! cache holds at most one entry (logical key `"current"`) with a fixed
//! TTL; once set it suppresses reload attempts until expiry or explicit
//! invalidation. Each manifest instance owns its cache; there is no
//! process-wide state. The time source is `tokio::time::Instant`, so
//! paused test clocks drive expiry deterministically.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

const SLOT_KEY: &str = "current";

/// Time-expiring flag over the in-memory set's trustworthiness.
pub(crate) struct FreshnessCache {
    /// Capacity-1 slot mapping the logical key to when it was set.
    slot: Mutex<LruCache<&'static str, Instant>>,
    ttl: Duration,
}

impl FreshnessCache {
    /// Create a cache with the given TTL.
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(LruCache::new(NonZeroUsize::MIN)),
            ttl,
        }
    }

    /// True iff the slot holds a non-expired flag.
    pub(crate) async fn is_fresh(&self) -> bool {
        let slot = self.slot.lock().await;
        match slot.peek(&SLOT_KEY) {
            Some(marked_at) => marked_at.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Set the flag with a fresh TTL.
    pub(crate) async fn mark_fresh(&self) {
        self.slot.lock().await.put(SLOT_KEY, Instant::now());
    }

    /// Clear the flag immediately.
    pub(crate) async fn invalidate(&self) {
        self.slot.lock().await.pop(&SLOT_KEY);
    }
}
