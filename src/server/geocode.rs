//! Geocode request parsing.

/// The `lat` and `lng` values of a geocode request
#[derive(Debug, Default)]
pub struct GeocodeQueryParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl GeocodeQueryParams {
    /// Pick `lat` and `lng` out of the decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "lat" if params.lat.is_none() => params.lat = Some(value),
                "lng" if params.lng.is_none() => params.lng = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Validate the query and return `(lat, lng)`.
///
/// Presence of both parameters is checked before either is parsed. Values use
/// Rust float syntax, so hex floats like `0x1p-2` are rejected.
pub fn parse_coordinates(params: &GeocodeQueryParams) -> Result<(f64, f64), &'static str> {
    let lat = params.lat.as_deref().unwrap_or("");
    let lng = params.lng.as_deref().unwrap_or("");

    if lat.is_empty() || lng.is_empty() {
        return Err("Missing lat or lng parameters");
    }

    let lat: f64 = lat.parse().map_err(|_| "Invalid lat parameter")?;
    let lng: f64 = lng.parse().map_err(|_| "Invalid lng parameter")?;

    Ok((lat, lng))
}
