//! Persisted snapshot format.
//!
//! The durable representation is deliberately decoupled from the in-memory
//! [`DateSet`](super::DateSet): this module owns the persisted schema and
//! its explicit encode/decode pair, so the blob layout can evolve without
//! leaking internal structure.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::error::ManifestResult;

/// Durable form of the index: `{ "dates": ["2020-01-01", ...] }`.
///
/// Dates are ISO calendar dates, ascending and unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The full date sequence. Nothing else about the index is persisted.
    pub dates: Vec<String>,
}

impl Snapshot {
    /// Capture the current date sequence.
    pub fn from_dates(dates: &[String]) -> Self {
        Self {
            dates: dates.to_vec(),
        }
    }

    /// Consume the snapshot, yielding its dates.
    pub fn into_dates(self) -> Vec<String> {
        self.dates
    }

    /// Encode to the JSON blob written to the store.
    pub fn encode(&self) -> ManifestResult<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    /// Decode a blob fetched from the store.
    ///
    /// A malformed blob yields [`ManifestError::Decode`](super::ManifestError::Decode),
    /// which the load protocol treats as a failed snapshot fetch.
    pub fn decode(data: &[u8]) -> ManifestResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
