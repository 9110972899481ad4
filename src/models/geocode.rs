//! Google Geocoding API compatible response documents.

use serde::Serialize;

use super::AreaMatch;

const LOCALITY_TYPES: [&str; 2] = ["locality", "political"];

/// place_id reported when no region contains the point
pub const UNKNOWN_PLACE_ID: &str = "unknown";

/// Top-level geocode response
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResult {
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: String,
    pub geometry: ResultGeometry,
    pub place_id: String,
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultGeometry {
    pub location: LatLng,
    pub location_type: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// Build the response for a lookup outcome.
    ///
    /// A match is reported as `"<area>, <locality>"`. No match falls back to
    /// the locality itself with an unknown place id.
    pub fn from_match(area: &AreaMatch, location: LatLng, locality: &str) -> Self {
        let result = if area.is_match() {
            GeocodeResult::new(
                format!("{}, {}", area.name, locality),
                area.name.clone(),
                area.name.clone(),
                area.id.clone(),
                location,
            )
        } else {
            GeocodeResult::new(
                locality.to_string(),
                locality.to_string(),
                locality.to_string(),
                UNKNOWN_PLACE_ID.to_string(),
                location,
            )
        };

        Self {
            results: vec![result],
            status: "OK".to_string(),
        }
    }
}

impl GeocodeResult {
    fn new(
        long_name: String,
        short_name: String,
        formatted_address: String,
        place_id: String,
        location: LatLng,
    ) -> Self {
        Self {
            address_components: vec![AddressComponent {
                long_name,
                short_name,
                types: locality_types(),
            }],
            formatted_address,
            geometry: ResultGeometry {
                location,
                location_type: "APPROXIMATE".to_string(),
            },
            place_id,
            types: locality_types(),
        }
    }
}

fn locality_types() -> Vec<String> {
    LOCALITY_TYPES.iter().map(|t| t.to_string()).collect()
}
