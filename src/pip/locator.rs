//! Ray casting point-in-polygon lookup.

use geo::Coord;
use tracing::debug;

use crate::models::Region;

/// Even-odd ray casting test against a single ring.
///
/// The ring is closed implicitly by wrapping back to vertex 0. Edges are
/// counted when the point's latitude lies in `(min, max]` of the edge, so a
/// shared vertex is only crossed once. Points exactly on an edge may land on
/// either side. Rings with fewer than three vertices never contain anything.
pub fn ring_contains(ring: &[Coord<f64>], lng: f64, lat: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut p1 = ring[0];

    for i in 0..=n {
        let p2 = ring[i % n];

        if lat > p1.y.min(p2.y) && lat <= p1.y.max(p2.y) && lng <= p1.x.max(p2.x) && p1.y != p2.y
        {
            let x_intersect = (lat - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || lng <= x_intersect {
                inside = !inside;
            }
        }

        p1 = p2;
    }

    inside
}

impl Region {
    /// Whether the outer ring contains the point
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        ring_contains(&self.boundary.0, lng, lat)
    }
}

/// First region in dataset order containing the point.
pub fn locate_in<'a>(regions: &'a [Region], lng: f64, lat: f64) -> Option<&'a Region> {
    regions.iter().find(|region| {
        if region.is_degenerate() {
            debug!(
                "Region {} has {} vertices, skipping",
                region.name,
                region.boundary.0.len()
            );
            return false;
        }
        region.contains(lng, lat)
    })
}
