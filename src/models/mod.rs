//! Core data models for the area lookup service.

pub mod geocode;
pub mod region;

pub use geocode::{GeocodeResponse, LatLng};
pub use region::{AreaMatch, BoundaryDataset, Region};
