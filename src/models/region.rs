//! Named boundary regions loaded from the areas file.

use geo::{Coord, LineString};

/// A named area with a single outer ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Display label
    pub name: String,

    /// Opaque place reference, empty for older datasets
    pub id: String,

    /// Outer ring, `x` = longitude, `y` = latitude
    pub boundary: LineString<f64>,
}

impl Region {
    pub fn new(name: impl Into<String>, id: impl Into<String>, ring: Vec<Coord<f64>>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            boundary: LineString::new(ring),
        }
    }

    /// Build a region from `(lng, lat)` pairs
    pub fn from_lng_lat(name: &str, id: &str, ring: &[(f64, f64)]) -> Self {
        let coords = ring.iter().map(|&(x, y)| Coord { x, y }).collect();
        Self::new(name, id, coords)
    }

    /// Fewer than three vertices cannot enclose anything.
    pub fn is_degenerate(&self) -> bool {
        self.boundary.0.len() < 3
    }
}

/// Regions in file order. Order decides which region wins on overlap.
pub type BoundaryDataset = Vec<Region>;

/// Result of a point lookup.
///
/// Both fields empty means no region contained the point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaMatch {
    pub name: String,
    pub id: String,
}

impl AreaMatch {
    pub fn from_region(region: &Region) -> Self {
        Self {
            name: region.name.clone(),
            id: region.id.clone(),
        }
    }

    pub fn is_match(&self) -> bool {
        !self.name.is_empty()
    }
}
