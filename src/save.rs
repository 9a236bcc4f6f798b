//! Save coordination: serialized writes with burst coalescing.
//!
//! At most one snapshot write runs against the store at a time. A `save()`
//! arriving while a write is in flight sets a pending flag and awaits the
//! shared outcome instead of starting a second concurrent write; when the
//! in-flight write completes with the flag set, exactly one more write runs,
//! capturing whatever the date set looks like at that moment. A burst of
//! concurrent callers therefore costs at most two writes, and the final
//! write always reflects the latest state.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use super::config::SNAPSHOT_CONTENT_TYPE;
use super::error::ManifestResult;
use super::load::{await_outcome, OutcomeReceiver, OutcomeSender};
use super::manifest::ManifestShared;
use super::snapshot::Snapshot;

/// Serializes writes of the date-set snapshot to the durable blob.
pub(crate) struct SaveCoordinator {
    state: Mutex<SaveSlot>,
}

struct SaveSlot {
    /// Handle of the save currently in progress, if any.
    in_flight: Option<OutcomeReceiver>,
    /// Newer state arrived while saving; one more write is owed.
    pending: bool,
}

enum Role {
    Runner(OutcomeSender),
    Waiter(OutcomeReceiver),
}

impl SaveCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SaveSlot {
                in_flight: None,
                pending: false,
            }),
        }
    }

    /// Persist the current date set, coalescing with any save in flight.
    ///
    /// A write failure propagates to every caller awaiting this cycle; the
    /// coordinator resets so a future `save()` starts from scratch. No
    /// partial snapshot is ever written.
    pub(crate) async fn save(&self, shared: &Arc<ManifestShared>) -> ManifestResult<()> {
        let role = {
            let mut slot = self.state.lock().await;
            match slot.in_flight.clone() {
                Some(rx) => {
                    slot.pending = true;
                    Role::Waiter(rx)
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    slot.in_flight = Some(rx);
                    Role::Runner(tx)
                }
            }
        };

        match role {
            Role::Waiter(rx) => await_outcome(rx, "save").await,
            Role::Runner(tx) => {
                let result = loop {
                    let attempt = write_snapshot(shared).await;
                    let mut slot = self.state.lock().await;
                    if attempt.is_ok() && slot.pending {
                        // One more cycle, capturing the state as of now.
                        slot.pending = false;
                        continue;
                    }
                    slot.pending = false;
                    slot.in_flight = None;
                    break attempt;
                };
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }
}

/// Serialize the date set as of this instant and write it to the blob key.
async fn write_snapshot(shared: &ManifestShared) -> ManifestResult<()> {
    let snapshot = Snapshot::from_dates(shared.dates.read().await.as_slice());
    let body = snapshot.encode()?;
    let key = shared.config.manifest_key();
    shared
        .client
        .put_object(&key, body, SNAPSHOT_CONTENT_TYPE)
        .await?;
    debug!(%key, dates = snapshot.dates.len(), "snapshot persisted");
    Ok(())
}
