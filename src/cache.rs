//! ## Dataset Cache
//!
//! A read-through cache for the load-and-clean step. Entries are keyed on the identity of both
//! source files (path, modification time, and length), so an unchanged pair of files is read
//! and cleaned once per process while a rewritten file triggers a reload. The cache is an
//! ordinary value owned by the caller; there is no global instance.

use crate::dataset::TripDataset;
use crate::exceptions::DashboardResult;
use crate::loader::{ensure_readable, load_dataset};
use crate::settings::SourceSettings;
use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Version stamp of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileVersion {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileVersion {
    fn of(path: &Path, metadata: &Metadata) -> Self {
        Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }

    /// Stats `path`; fails with `IoError` when the file cannot be read.
    pub fn probe(path: &Path) -> DashboardResult<Self> {
        let metadata = ensure_readable(path)?;
        Ok(Self::of(path, &metadata))
    }
}

/// Identity of a (trips, zones) source pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub trips: FileVersion,
    pub zones: FileVersion,
}

impl SourceKey {
    pub fn probe(sources: &SourceSettings) -> DashboardResult<Self> {
        Ok(Self {
            trips: FileVersion::probe(&sources.trip_path)?,
            zones: FileVersion::probe(&sources.zone_path)?,
        })
    }
}

#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<TripDataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset for `sources`, loading and cleaning it on first access or
    /// after either file changed.
    pub async fn get_or_load(
        &mut self,
        sources: &SourceSettings,
    ) -> DashboardResult<Arc<TripDataset>> {
        let key = SourceKey::probe(sources)?;
        if let Some(dataset) = self.entries.get(&key) {
            debug!("Dataset cache hit for {:?}", key.trips.path);
            return Ok(Arc::clone(dataset));
        }

        // Older versions of the same files can never be hit again.
        self.entries
            .retain(|k, _| k.trips.path != key.trips.path || k.zones.path != key.zones.path);

        let dataset = Arc::new(load_dataset(sources).await?);
        self.loads += 1;
        info!("Dataset cache filled (load #{})", self.loads);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Number of times a dataset was actually loaded from disk.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
