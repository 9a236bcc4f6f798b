//! # Date Manifest
//!
//! This crate maintains a single logical index, a sorted and deduplicated
//! set of calendar dates, durably persisted as a small JSON blob in a
//! remote object store while also being reconstructible by scanning the
//! store's key namespace.
//!
//! ## Overview
//!
//! There is no transactional backend. The index stays correct and fresh
//! under concurrent readers and writers by tolerating staleness, merging
//! two disagreeing reconstruction sources, and coalescing concurrent
//! operations instead of racing them against the store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        DateManifest                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  In-Memory:                                                      │
//! │  ├─ DateSet (sorted, deduplicated YYYY-MM-DD strings)           │
//! │  └─ FreshnessCache (single slot, 120 s TTL)                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Coordinators:                                                   │
//! │  ├─ LoadCoordinator (snapshot vs. listing race, one in flight)  │
//! │  └─ SaveCoordinator (serialized writes, burst coalescing)       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  On the store (via RemoteStore):                                 │
//! │  ├─ <prefix>manifest.json   (durable snapshot)                  │
//! │  └─ <prefix>views/...       (date-named keys, rebuild source)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Flow
//!
//! ```text
//! 1. Freshness flag holds? → serve from memory, zero round-trips
//! 2. Load already in flight? → await its shared outcome
//! 3. Otherwise race two paths into a compare-and-set commit latch:
//!      snapshot path: get manifest.json → decode → merge
//!      rebuild path:  1000 ms grace → list views/ → extract dates → merge
//! 4. First committed merge wins; the loser's result is discarded
//! 5. Success marks the flag; a rebuild that changed the set also writes
//!    a reconciling snapshot
//! ```
//!
//! ## Use Case
//!
//! The index is designed for date-partitioned artifact namespaces (daily
//! reports, rollups, exported views) where callers need "which days exist
//! before D" answered cheaply, and where the snapshot blob can lag, vanish
//! or be rebuilt from the keys themselves: eventually correct, never
//! duplicated, rarely re-fetched.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! // Any RemoteStore implementation: aws-sdk-s3, opendal, a mock...
//! let store = Arc::new(MyRemoteStore::new("my-bucket"));
//!
//! let manifest = DateManifest::new(
//!     store,
//!     ManifestConfig::new("my-bucket", "reports"),
//! );
//!
//! // Range query; the first call populates the index.
//! let recent = manifest.dates_before("2020-06-01", 14).await?;
//!
//! // Record a new date; persists only when it was genuinely new.
//! manifest.add_date("2020-06-02").await?;
//! ```

mod client;
mod config;
mod date_set;
mod error;
mod freshness;
mod listing;
mod load;
mod manifest;
mod save;
mod snapshot;

pub use client::RemoteStore;
pub use config::{
    ManifestConfig, FRESHNESS_TTL, MAX_LISTED_KEYS, REBUILD_GRACE, SNAPSHOT_CONTENT_TYPE,
};
pub use date_set::DateSet;
pub use error::{ManifestError, ManifestResult};
pub use manifest::DateManifest;
pub use snapshot::Snapshot;

#[cfg(test)]
pub(crate) mod mock_client;
