//! Load coordination: dual-source reconstruction with request coalescing.
//!
//! A load races two reconstruction strategies:
//!
//! 1. **Snapshot path**: fetch the durable blob and merge its dates.
//! 2. **Rebuild path**: after a fixed grace delay, list the `views/`
//!    namespace and merge the dates extracted from its keys.
//!
//! The two paths run as independent tasks reporting into a shared
//! compare-and-set commit latch: the first to commit wins, and the loser's
//! completed fetch is discarded rather than double-applied. Nothing is
//! cancelled; the latch only discards results. Per-path failures are
//! swallowed; the load as a whole fails only when both paths fail with no
//! data applied.
//!
//! Concurrent `ensure_fresh` callers coalesce onto a single in-flight load:
//! one caller becomes the runner, everyone else awaits the shared outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use super::config::{MAX_LISTED_KEYS, REBUILD_GRACE};
use super::error::{ManifestError, ManifestResult};
use super::listing::date_from_key;
use super::manifest::ManifestShared;
use super::snapshot::Snapshot;

/// Shared outcome slot for a coalesced operation: `None` until settled.
pub(crate) type OutcomeReceiver = watch::Receiver<Option<ManifestResult<()>>>;
pub(crate) type OutcomeSender = watch::Sender<Option<ManifestResult<()>>>;

/// Await the outcome of an in-flight operation another caller is running.
pub(crate) async fn await_outcome(
    mut rx: OutcomeReceiver,
    operation: &str,
) -> ManifestResult<()> {
    loop {
        let settled = rx.borrow_and_update().clone();
        if let Some(outcome) = settled {
            return outcome;
        }
        if rx.changed().await.is_err() {
            return Err(ManifestError::internal(format!(
                "{operation} dropped before completing"
            )));
        }
    }
}

/// Deduplicates concurrent load requests into one in-flight operation.
pub(crate) struct LoadCoordinator {
    /// Handle of the load currently in progress, if any.
    slot: Mutex<Option<OutcomeReceiver>>,
}

enum Role {
    Runner(OutcomeSender),
    Waiter(OutcomeReceiver),
}

impl LoadCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Make sure a load has completed recently enough.
    ///
    /// Returns immediately while the freshness flag holds. Otherwise either
    /// runs a load or attaches to the one already in flight. A successful
    /// load marks the flag; a failed one leaves flag and state untouched so
    /// the next caller retries.
    pub(crate) async fn ensure_fresh(&self, shared: &Arc<ManifestShared>) -> ManifestResult<()> {
        if shared.freshness.is_fresh().await {
            return Ok(());
        }

        let role = {
            let mut slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(rx) => Role::Waiter(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    *slot = Some(rx);
                    Role::Runner(tx)
                }
            }
        };

        match role {
            Role::Waiter(rx) => await_outcome(rx, "load").await,
            Role::Runner(tx) => {
                // A load may have finished between the freshness check and
                // winning the runner slot.
                let result = if shared.freshness.is_fresh().await {
                    Ok(())
                } else {
                    run_load(shared).await
                };
                if result.is_ok() {
                    shared.freshness.mark_fresh().await;
                }
                *self.slot.lock().await = None;
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }
}

/// Run one load: race the snapshot path against the listing rebuild.
///
/// Resolves as soon as either path commits; the loser keeps running
/// detached and self-discards via the latch.
async fn run_load(shared: &Arc<ManifestShared>) -> ManifestResult<()> {
    let latch = Arc::new(AtomicBool::new(false));
    let mut snapshot_task = tokio::spawn(snapshot_path(shared.clone(), latch.clone()));
    let mut rebuild_task = tokio::spawn(rebuild_path(shared.clone(), latch.clone()));

    tokio::select! {
        snapshot = &mut snapshot_task => {
            let snapshot = settle_path(snapshot, "snapshot");
            if matches!(snapshot, Ok(true)) {
                return Ok(());
            }
            let listing = settle_path(rebuild_task.await, "listing");
            conclude(snapshot, listing)
        }
        rebuild = &mut rebuild_task => {
            let listing = settle_path(rebuild, "listing");
            if matches!(listing, Ok(true)) {
                return Ok(());
            }
            let snapshot = settle_path(snapshot_task.await, "snapshot");
            conclude(snapshot, listing)
        }
    }
}

/// Collapse a path task's join result, logging swallowed failures.
fn settle_path(
    joined: Result<ManifestResult<bool>, tokio::task::JoinError>,
    path: &str,
) -> ManifestResult<bool> {
    match joined {
        Ok(Ok(committed)) => Ok(committed),
        Ok(Err(error)) => {
            warn!(path, %error, "load path failed");
            Err(error)
        }
        Err(join_error) => {
            warn!(path, %join_error, "load path aborted");
            Err(ManifestError::internal(format!(
                "{path} path aborted: {join_error}"
            )))
        }
    }
}

/// The load fails only when both paths failed with no data applied.
fn conclude(
    snapshot: ManifestResult<bool>,
    listing: ManifestResult<bool>,
) -> ManifestResult<()> {
    match (snapshot, listing) {
        (Err(snapshot), Err(listing)) => Err(ManifestError::AllSourcesFailed {
            snapshot: snapshot.to_string(),
            listing: listing.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Fetch and apply the durable snapshot. Returns whether this path won.
async fn snapshot_path(
    shared: Arc<ManifestShared>,
    latch: Arc<AtomicBool>,
) -> ManifestResult<bool> {
    let key = shared.config.manifest_key();
    let body = shared.client.get_object(&key).await?;
    let snapshot = Snapshot::decode(&body)?;

    if latch
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!(%key, "snapshot arrived after rebuild committed, discarding");
        return Ok(false);
    }

    let changed = shared.dates.write().await.merge(snapshot.into_dates());
    debug!(%key, changed, "snapshot applied");
    Ok(true)
}

/// List the `views/` namespace and apply the dates its keys carry.
/// Returns whether this path won.
async fn rebuild_path(
    shared: Arc<ManifestShared>,
    latch: Arc<AtomicBool>,
) -> ManifestResult<bool> {
    // Head start for the snapshot path.
    tokio::time::sleep(REBUILD_GRACE).await;
    if latch.load(Ordering::Acquire) {
        return Ok(false);
    }

    let prefix = shared.config.views_prefix();
    let keys = shared.client.list_objects(&prefix, MAX_LISTED_KEYS).await?;
    if keys.len() >= MAX_LISTED_KEYS {
        warn!(
            %prefix,
            cap = MAX_LISTED_KEYS,
            "listing hit the key cap, rebuild may be incomplete"
        );
    }

    let dates: Vec<String> = keys.iter().filter_map(|key| date_from_key(key)).collect();

    if latch
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!(%prefix, "listing arrived after snapshot committed, discarding");
        return Ok(false);
    }

    let changed = shared.dates.write().await.merge(dates);
    debug!(%prefix, changed, "listing rebuild applied");

    if changed {
        // The listing uncovered dates the durable snapshot is missing;
        // reconcile it. The load itself has already succeeded, so a failure
        // here is logged and left for a later save to repair.
        if let Err(error) = shared.saver.save(&shared).await {
            warn!(%error, "reconciling save after rebuild failed");
        }
    }
    Ok(true)
}
