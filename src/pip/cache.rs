//! Parsed dataset cache keyed on the areas file's modification time.

use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tracing::{error, info};

use super::boundary::{BoundaryStore, DatasetSource};
use crate::models::BoundaryDataset;

struct Snapshot {
    modified: SystemTime,
    dataset: Arc<BoundaryDataset>,
}

/// Keeps the last parsed dataset until the file on disk changes.
///
/// Readers clone the current `Arc`; a refresh parses outside the lock and
/// swaps the whole snapshot in one write.
pub struct BoundaryCache {
    store: BoundaryStore,
    current: RwLock<Option<Snapshot>>,
}

impl BoundaryCache {
    pub fn new(store: BoundaryStore) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    fn cached(&self, modified: SystemTime) -> Option<Arc<BoundaryDataset>> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|snapshot| snapshot.modified == modified)
            .map(|snapshot| Arc::clone(&snapshot.dataset))
    }

    fn replace(&self, snapshot: Option<Snapshot>) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = snapshot;
    }
}

impl DatasetSource for BoundaryCache {
    fn dataset(&self) -> Arc<BoundaryDataset> {
        let modified = match std::fs::metadata(self.store.path()).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(e) => {
                error!("failed to stat {}: {}", self.store.path().display(), e);
                self.replace(None);
                return Arc::new(Vec::new());
            }
        };

        if let Some(dataset) = self.cached(modified) {
            return dataset;
        }

        match self.store.load() {
            Ok(regions) => {
                info!(
                    "Loaded {} regions from {}",
                    regions.len(),
                    self.store.path().display()
                );
                let dataset = Arc::new(regions);
                self.replace(Some(Snapshot {
                    modified,
                    dataset: Arc::clone(&dataset),
                }));
                dataset
            }
            Err(e) => {
                error!("{}", e);
                self.replace(None);
                Arc::new(Vec::new())
            }
        }
    }
}
