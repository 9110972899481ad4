//! Locate service wiring a dataset source to the ray casting lookup.

use tracing::debug;

use super::boundary::{BoundaryStore, DatasetSource};
use super::cache::BoundaryCache;
use super::locator::locate_in;
use crate::models::AreaMatch;

/// Point-in-Polygon lookup service
pub struct PipService {
    source: Box<dyn DatasetSource>,
}

impl PipService {
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// Service that rereads the file on every lookup
    pub fn uncached(store: BoundaryStore) -> Self {
        Self::new(Box::new(store))
    }

    /// Service that reparses only when the file's mtime changes
    pub fn cached(store: BoundaryStore) -> Self {
        Self::new(Box::new(BoundaryCache::new(store)))
    }

    /// Find the region containing a point.
    ///
    /// Returns an empty [`AreaMatch`] when nothing contains it, including when
    /// the dataset could not be loaded.
    pub fn locate(&self, lng: f64, lat: f64) -> AreaMatch {
        let dataset = self.source.dataset();

        let area = locate_in(&dataset, lng, lat)
            .map(AreaMatch::from_region)
            .unwrap_or_default();

        debug!(
            "PIP lookup at ({}, {}) over {} regions: {:?}",
            lng,
            lat,
            dataset.len(),
            area
        );

        area
    }
}
