//! Configuration for the date manifest.
//!
//! Freshness TTL, rebuild grace and the listing cap are fixed policy, not
//! per-call knobs, so they live here as constants rather than config fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a successful load keeps the in-memory set trustworthy.
pub const FRESHNESS_TTL: Duration = Duration::from_secs(120);

/// Head start granted to the snapshot path before the listing rebuild runs.
pub const REBUILD_GRACE: Duration = Duration::from_millis(1000);

/// Maximum number of keys consumed from a single listing.
pub const MAX_LISTED_KEYS: usize = 1000;

/// Content type recorded with the persisted snapshot.
pub const SNAPSHOT_CONTENT_TYPE: &str = "application/json";

/// Configuration for a [`DateManifest`](super::DateManifest) instance.
///
/// # Example
///
/// ```rust,ignore
/// let config = ManifestConfig::new("my-data-bucket", "reports");
/// assert_eq!(config.manifest_key(), "reports/manifest.json");
/// assert_eq!(config.views_prefix(), "reports/views/");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Bucket name, for addressing and diagnostics. The [`RemoteStore`]
    /// implementation owns bucket selection; the index only derives keys.
    ///
    /// [`RemoteStore`]: super::RemoteStore
    pub bucket: String,

    /// Key prefix under which the snapshot blob and the `views/` namespace
    /// live. Normalized to end with `/` when non-empty.
    pub prefix: String,
}

impl ManifestConfig {
    /// Create a new configuration.
    ///
    /// A non-empty `prefix` without a trailing delimiter gets one appended.
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            bucket: bucket.into(),
            prefix,
        }
    }

    /// Key of the durable snapshot blob.
    pub fn manifest_key(&self) -> String {
        format!("{}manifest.json", self.prefix)
    }

    /// Prefix scanned by the listing rebuild.
    pub fn views_prefix(&self) -> String {
        format!("{}views/", self.prefix)
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: String::new(),
        }
    }
}
