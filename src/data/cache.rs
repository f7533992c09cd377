//! Process-wide memoization of the fetched dataset.
//!
//! The first `get()` loads from the source; every later call returns the same
//! `Arc<Snapshot>` until `refresh()` swaps in a new one. Loading happens under
//! the write lock so concurrent first callers trigger a single request.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::domain::Dataset;
use crate::error::DataError;

/// Something that can produce the full dataset (the HTTP API, or a fake in tests).
pub trait DatasetSource {
    fn load(&self) -> Result<Dataset, DataError>;

    /// Where the data comes from, for display.
    fn location(&self) -> &str;
}

/// A loaded dataset and when it was loaded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dataset: Dataset,
    pub fetched_at: DateTime<Local>,
}

pub struct DatasetCache<S> {
    source: S,
    slot: RwLock<Option<Arc<Snapshot>>>,
}

impl<S: DatasetSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cached snapshot, loading it on first use.
    pub fn get(&self) -> Result<Arc<Snapshot>, DataError> {
        if let Some(snapshot) = self.cached() {
            debug!("dataset cache hit ({} records)", snapshot.dataset.len());
            return Ok(snapshot);
        }

        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(snapshot) = slot.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(self.load_snapshot()?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Re-fetch unconditionally. On failure the previous snapshot stays cached.
    pub fn refresh(&self) -> Result<Arc<Snapshot>, DataError> {
        info!("refreshing dataset cache");
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        match self.load_snapshot() {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *slot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(err) => {
                if slot.is_some() {
                    warn!("refresh failed, keeping previous dataset: {err}");
                }
                Err(err)
            }
        }
    }

    /// Snapshot if one has been loaded, without triggering a fetch.
    pub fn cached(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn load_snapshot(&self) -> Result<Snapshot, DataError> {
        let dataset = self.source.load()?;
        Ok(Snapshot {
            dataset,
            fetched_at: Local::now(),
        })
    }
}
