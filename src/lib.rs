//! Areafinder - point-in-polygon reverse geocoding over a fixed set of areas
//!
//! This library provides the boundary loading, lookup and response types used
//! by the server binary.

pub mod config;
pub mod models;
pub mod pip;

pub use models::{AreaMatch, GeocodeResponse, Region};
pub use pip::PipService;
