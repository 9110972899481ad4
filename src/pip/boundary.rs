//! Boundary extraction from the GeoJSON areas file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo::Coord;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::{BoundaryDataset, Region};

/// Failure to produce a dataset from the backing file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Anything that can hand out the current boundary dataset.
///
/// Implementations never fail: an unreadable or broken source yields an
/// empty dataset.
pub trait DatasetSource: Send + Sync {
    fn dataset(&self) -> Arc<BoundaryDataset>;
}

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    features: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    properties: PropertiesDoc,
    geometry: GeometryDoc,
}

#[derive(Deserialize)]
struct PropertiesDoc {
    name: String,
    #[serde(default, deserialize_with = "lenient_id")]
    id: String,
}

/// Strings are kept, numbers are written out, anything else is empty.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[derive(Deserialize)]
struct GeometryDoc {
    coordinates: Vec<Vec<Vec<f64>>>,
}

/// Parse a FeatureCollection document into regions.
///
/// The document must be an object with a `features` array. Individual
/// features that lack a name or usable coordinates are skipped.
pub fn parse_dataset(bytes: &[u8]) -> Result<BoundaryDataset, serde_json::Error> {
    let collection: FeatureCollectionDoc = serde_json::from_slice(bytes)?;

    let mut regions = Vec::with_capacity(collection.features.len());

    for (index, value) in collection.features.into_iter().enumerate() {
        let feature: FeatureDoc = match serde_json::from_value(value) {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping feature {}: {}", index, e);
                continue;
            }
        };

        let FeatureDoc {
            properties,
            geometry,
        } = feature;

        // Only the outer ring is used; holes and extra rings are dropped.
        let ring = match geometry.coordinates.into_iter().next() {
            Some(positions) => match ring_from_positions(positions) {
                Some(ring) => ring,
                None => {
                    warn!(
                        "Skipping feature {} ({}): position with fewer than two numbers",
                        index, properties.name
                    );
                    continue;
                }
            },
            None => Vec::new(),
        };

        regions.push(Region::new(properties.name, properties.id, ring));
    }

    Ok(regions)
}

fn ring_from_positions(positions: Vec<Vec<f64>>) -> Option<Vec<Coord<f64>>> {
    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}

/// Reads the areas file from disk on every call.
#[derive(Debug, Clone)]
pub struct BoundaryStore {
    path: PathBuf,
}

impl BoundaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file
    pub fn load(&self) -> Result<BoundaryDataset, LoadError> {
        let bytes = std::fs::read(&self.path).map_err(|source| LoadError::Unavailable {
            path: self.path.clone(),
            source,
        })?;

        let regions = parse_dataset(&bytes).map_err(|source| LoadError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        debug!("Number of features: {}", regions.len());
        Ok(regions)
    }

    /// Like [`load`](Self::load), but logs failures and returns an empty dataset.
    pub fn load_or_empty(&self) -> BoundaryDataset {
        self.load().unwrap_or_else(|e| {
            error!("{}", e);
            Vec::new()
        })
    }
}

impl DatasetSource for BoundaryStore {
    fn dataset(&self) -> Arc<BoundaryDataset> {
        Arc::new(self.load_or_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SABIAN: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Sabian", "id": "area-1" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[41.80, 9.59], [41.90, 9.59], [41.90, 9.65], [41.80, 9.65]],
                        [[41.84, 9.61], [41.86, 9.61], [41.86, 9.63], [41.84, 9.63]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Legehare" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[41.90, 9.59], [42.00, 9.59], [42.00, 9.65, 1200.0], [41.90, 9.65]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_first_ring_only() {
        let regions = parse_dataset(SABIAN.as_bytes()).unwrap();
        assert_eq!(regions.len(), 2);

        let sabian = &regions[0];
        assert_eq!(sabian.name, "Sabian");
        assert_eq!(sabian.id, "area-1");
        assert_eq!(sabian.boundary.0.len(), 4);
        assert_eq!(sabian.boundary.0[1], Coord { x: 41.90, y: 9.59 });
    }

    #[test]
    fn test_point_in_hole_still_matches() {
        let regions = parse_dataset(SABIAN.as_bytes()).unwrap();
        let found = crate::pip::locate_in(&regions, 41.85, 9.62).unwrap();
        assert_eq!(found.name, "Sabian");
    }

    #[test]
    fn test_missing_id_defaults_to_empty() {
        let regions = parse_dataset(SABIAN.as_bytes()).unwrap();
        assert_eq!(regions[1].name, "Legehare");
        assert_eq!(regions[1].id, "");
        // altitude is dropped
        assert_eq!(regions[1].boundary.0[2], Coord { x: 42.00, y: 9.65 });
    }

    #[test]
    fn test_feature_without_name_is_skipped() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                { "properties": { "id": "x" }, "geometry": { "coordinates": [[[0, 0], [1, 0], [1, 1]]] } },
                { "properties": { "name": "NoGeometry" } },
                { "properties": { "name": "Kept", "id": null }, "geometry": { "coordinates": [[[0, 0], [1, 0], [1, 1]]] } }
            ]
        }"#;

        let regions = parse_dataset(doc.as_bytes()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Kept");
        assert_eq!(regions[0].id, "");
    }

    #[test]
    fn test_non_string_id_keeps_feature() {
        let doc = r#"{
            "features": [
                { "properties": { "name": "Numbered", "id": 5 }, "geometry": { "coordinates": [[[0, 0], [1, 0], [1, 1]]] } },
                { "properties": { "name": "Listed", "id": ["a"] }, "geometry": { "coordinates": [[[0, 0], [1, 0], [1, 1]]] } }
            ]
        }"#;

        let regions = parse_dataset(doc.as_bytes()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].id, "5");
        assert_eq!(regions[1].name, "Listed");
        assert_eq!(regions[1].id, "");
    }

    #[test]
    fn test_short_position_skips_feature() {
        let doc = r#"{
            "features": [
                { "properties": { "name": "Bad" }, "geometry": { "coordinates": [[[0, 0], [1], [1, 1]]] } },
                { "properties": { "name": "Good" }, "geometry": { "coordinates": [[[0, 0], [1, 0], [1, 1]]] } }
            ]
        }"#;

        let regions = parse_dataset(doc.as_bytes()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Good");
    }

    #[test]
    fn test_empty_coordinates_give_degenerate_region() {
        let doc = r#"{ "features": [ { "properties": { "name": "Empty" }, "geometry": { "coordinates": [] } } ] }"#;

        let regions = parse_dataset(doc.as_bytes()).unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions[0].is_degenerate());
    }

    #[test]
    fn test_not_a_collection_is_malformed() {
        assert!(parse_dataset(b"{\"type\": \"Feature\"}").is_err());
        assert!(parse_dataset(b"not json").is_err());
    }

    #[test]
    fn test_store_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SABIAN.as_bytes()).unwrap();

        let store = BoundaryStore::new(file.path());
        let regions = store.load().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(store.dataset().len(), 2);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = BoundaryStore::new(dir.path().join("areas.json"));

        assert!(matches!(store.load(), Err(LoadError::Unavailable { .. })));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn test_broken_file_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"features\": [").unwrap();

        let store = BoundaryStore::new(file.path());
        assert!(matches!(store.load(), Err(LoadError::Malformed { .. })));
        assert!(store.dataset().is_empty());
    }
}
