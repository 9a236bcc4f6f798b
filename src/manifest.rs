//! The manifest facade - the primary interface to the date index.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::client::RemoteStore;
use super::config::{ManifestConfig, FRESHNESS_TTL};
use super::date_set::DateSet;
use super::error::{ManifestError, ManifestResult};
use super::freshness::FreshnessCache;
use super::listing::is_valid_date;
use super::load::LoadCoordinator;
use super::save::SaveCoordinator;

/// State shared by the facade and its coordinators.
pub(crate) struct ManifestShared {
    /// Remote store implementation.
    pub(crate) client: Arc<dyn RemoteStore>,
    /// Configuration.
    pub(crate) config: ManifestConfig,
    /// The index itself. Replaced wholesale by merges; element-inserted
    /// only by `add_date`.
    pub(crate) dates: RwLock<DateSet>,
    /// Is the in-memory set currently trustworthy.
    pub(crate) freshness: FreshnessCache,
    /// Load deduplication.
    pub(crate) loader: LoadCoordinator,
    /// Save serialization.
    pub(crate) saver: SaveCoordinator,
}

/// Durable, listing-reconstructible index of calendar dates.
///
/// `DateManifest` keeps a sorted, deduplicated set of `YYYY-MM-DD` dates in
/// memory, persists it as a small JSON blob at `<prefix>manifest.json`, and
/// can rebuild it by scanning the `<prefix>views/` key namespace. It
/// tolerates being stale, being rebuilt from two disagreeing sources, and
/// being driven by many concurrent callers:
///
/// - **Loads** race a fast snapshot fetch against a grace-delayed listing
///   rebuild; concurrent callers share one in-flight load.
/// - **Freshness** is cached for a fixed TTL so repeated queries cost zero
///   round-trips.
/// - **Saves** are serialized and coalesced: a burst of concurrent save
///   requests costs at most two writes.
///
/// # Thread Safety
///
/// `DateManifest` is `Clone` and safe to share across tasks; clones share
/// the same state.
///
/// # Example
///
/// ```rust,ignore
/// let manifest = DateManifest::new(
///     Arc::new(my_store),
///     ManifestConfig::new("my-bucket", "reports"),
/// );
///
/// // Range query (loads on first use).
/// let recent = manifest.dates_before("2020-06-01", 14).await?;
///
/// // Record a new date; persists when it was genuinely new.
/// if manifest.add_date("2020-06-02").await? {
///     println!("new date recorded");
/// }
/// ```
#[derive(Clone)]
pub struct DateManifest {
    pub(crate) shared: Arc<ManifestShared>,
}

impl DateManifest {
    /// Create a manifest over the given store.
    ///
    /// No remote call happens here; the index is populated lazily by the
    /// first query or explicitly via [`refresh`](Self::refresh).
    pub fn new(client: Arc<dyn RemoteStore>, config: ManifestConfig) -> Self {
        Self {
            shared: Arc::new(ManifestShared {
                client,
                config,
                dates: RwLock::new(DateSet::new()),
                freshness: FreshnessCache::new(FRESHNESS_TTL),
                loader: LoadCoordinator::new(),
                saver: SaveCoordinator::new(),
            }),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ManifestConfig {
        &self.shared.config
    }

    /// Return up to `limit` dates strictly before `date`, ascending.
    ///
    /// Ensures a load has completed recently (fresh or rebuilt), then
    /// queries the in-memory set.
    ///
    /// # Errors
    ///
    /// Fails only when no load has ever succeeded and both reconstruction
    /// sources fail.
    pub async fn dates_before(&self, date: &str, limit: usize) -> ManifestResult<Vec<String>> {
        self.shared.loader.ensure_fresh(&self.shared).await?;
        Ok(self.shared.dates.read().await.range_before(date, limit))
    }

    /// Record a date, persisting the index when it was genuinely new.
    ///
    /// Returns `false` without touching the store when the date is already
    /// present. When it appears absent, the freshness cache is invalidated
    /// and one reload runs before committing, so a date the store already
    /// knows about (under any key) is not re-inserted and re-saved.
    pub async fn add_date(&self, date: &str) -> ManifestResult<bool> {
        if !is_valid_date(date) {
            return Err(ManifestError::InvalidDate {
                value: date.to_string(),
            });
        }

        self.shared.loader.ensure_fresh(&self.shared).await?;
        if self.shared.dates.read().await.contains(date) {
            return Ok(false);
        }

        // The in-memory set may lag the store; refresh once before
        // committing.
        self.shared.freshness.invalidate().await;
        self.shared.loader.ensure_fresh(&self.shared).await?;

        let inserted = self.shared.dates.write().await.insert_sorted(date);
        if !inserted {
            return Ok(false);
        }
        self.shared.saver.save(&self.shared).await?;
        Ok(true)
    }

    /// Check whether a date is present in the index.
    pub async fn contains_date(&self, date: &str) -> ManifestResult<bool> {
        self.shared.loader.ensure_fresh(&self.shared).await?;
        Ok(self.shared.dates.read().await.contains(date))
    }

    /// All dates currently in the index, ascending.
    pub async fn all_dates(&self) -> ManifestResult<Vec<String>> {
        self.shared.loader.ensure_fresh(&self.shared).await?;
        Ok(self.shared.dates.read().await.as_slice().to_vec())
    }

    /// Persist the current date set now.
    ///
    /// Coalesces with any save already in flight.
    pub async fn save(&self) -> ManifestResult<()> {
        self.shared.saver.save(&self.shared).await
    }

    /// Drop the freshness flag and reload from the store.
    pub async fn refresh(&self) -> ManifestResult<()> {
        self.shared.freshness.invalidate().await;
        self.shared.loader.ensure_fresh(&self.shared).await
    }

    /// Drop the freshness flag without reloading.
    ///
    /// The next query will trigger a load.
    pub async fn invalidate_cache(&self) {
        self.shared.freshness.invalidate().await;
    }
}

impl fmt::Debug for DateManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateManifest")
            .field("bucket", &self.shared.config.bucket)
            .field("manifest_key", &self.shared.config.manifest_key())
            .finish()
    }
}
