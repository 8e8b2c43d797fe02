//! OSRM wire format: coordinate encoding and Table/Route response types.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service> and
//! <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;
use tourgate_core::GeoPoint;

/// Encode points as OSRM's `lon,lat;lon,lat;...` path segment.
///
/// Numbers print in shortest round-trip form; integral values keep a
/// trailing `.0`.
///
/// # Examples
///
/// ```
/// use tourgate_core::GeoPoint;
/// use tourgate_data::routing::encode_coordinates;
///
/// # fn main() -> Result<(), tourgate_core::ValidationError> {
/// let points = [GeoPoint::new(35.0, 135.0)?, GeoPoint::new(-10.5, 0.25)?];
/// assert_eq!(encode_coordinates(&points), "135.0,35.0;0.25,-10.5");
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn encode_coordinates(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(|point| {
            let coord = point.to_coord();
            format!("{},{}", format_degrees(coord.x), format_degrees(coord.y))
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn format_degrees(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// OSRM Table API response.
///
/// Only `distances` is requested (`annotations=distance`).
#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    /// Status code from OSRM; `"Ok"` on success. Some compatible services
    /// omit it.
    #[serde(default)]
    pub code: Option<String>,

    /// Error message accompanying a non-`"Ok"` code.
    #[serde(default)]
    pub message: Option<String>,

    /// Matrix of distances in metres. `null` marks an unroutable pair.
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Option<Vec<RouteEntry>>,
}

/// A single route: the overview geometry plus its legs.
#[derive(Debug, Deserialize)]
pub(crate) struct RouteEntry {
    /// Overview polyline for the whole route.
    #[serde(default)]
    pub geometry: Option<String>,

    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

/// One leg between consecutive waypoints.
#[derive(Debug, Deserialize)]
pub(crate) struct RouteLeg {
    #[serde(default)]
    pub geometry: Option<String>,
}

/// Whether an optional OSRM status code signals success.
pub(crate) fn is_ok_code(code: Option<&str>) -> bool {
    code.is_none_or(|value| value == "Ok")
}
