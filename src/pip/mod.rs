//! Point-in-Polygon (PIP) area lookup.
//!
//! Loads named boundaries from a GeoJSON file and finds the first one
//! containing a point using ray casting.

mod boundary;
mod cache;
mod locator;
mod service;

pub use boundary::{parse_dataset, BoundaryStore, DatasetSource, LoadError};
pub use cache::BoundaryCache;
pub use locator::{locate_in, ring_contains};
pub use service::PipService;
