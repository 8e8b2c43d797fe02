//! Optimisation request model: the raw wire payload, its validated form and
//! the indexed coordinate list handed to routing providers.

use crate::geo_point::{GeoPoint, ValidationError, Violation};
use crate::solver::TourSolution;

/// Upper bound on visit locations when none is configured.
pub const DEFAULT_MAX_LOCATIONS: usize = 10;

/// Bounds applied when validating a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Maximum number of visit locations, depot excluded.
    pub max_locations: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_locations: DEFAULT_MAX_LOCATIONS,
        }
    }
}

impl RequestLimits {
    /// Limits allowing up to `max_locations` visits.
    #[must_use]
    pub const fn new(max_locations: usize) -> Self {
        Self { max_locations }
    }

    /// Whether `count` visit locations are acceptable.
    #[must_use]
    pub const fn allows(&self, count: usize) -> bool {
        count >= 1 && count <= self.max_locations
    }
}

/// Unvalidated `{lat, lng}` pair as it arrives on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl From<GeoPoint> for LatLng {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat(),
            lng: point.lng(),
        }
    }
}

/// The JSON body of an optimisation request before validation.
///
/// # Examples
///
/// ```
/// use tourgate_core::{LatLng, OptimizePayload, RequestLimits};
///
/// let payload = OptimizePayload {
///     depot: LatLng { lat: 35.0, lng: 135.0 },
///     locations: vec![LatLng { lat: 35.1, lng: 135.2 }],
/// };
/// let request = payload.validate(&RequestLimits::default()).expect("valid request");
/// assert_eq!(request.locations().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OptimizePayload {
    /// Start and end point of the tour.
    pub depot: LatLng,
    /// Points to visit, in the order the caller listed them.
    pub locations: Vec<LatLng>,
}

impl OptimizePayload {
    /// Validate every point and the location count.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing each violated rule: the depot is
    /// reported as `depot` and each location as `locations[i]`.
    pub fn validate(&self, limits: &RequestLimits) -> Result<OptimizationRequest, ValidationError> {
        let mut violations = Vec::new();
        let depot = GeoPoint::checked("depot", self.depot.lat, self.depot.lng, &mut violations);
        let locations: Vec<Option<GeoPoint>> = self
            .locations
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                GeoPoint::checked(&format!("locations[{idx}]"), raw.lat, raw.lng, &mut violations)
            })
            .collect();
        if !limits.allows(locations.len()) {
            violations.push(Violation::LocationCount {
                count: locations.len(),
                max: limits.max_locations,
            });
        }

        match (depot, locations.into_iter().collect::<Option<Vec<_>>>()) {
            (Some(depot_point), Some(location_points)) if violations.is_empty() => {
                Ok(OptimizationRequest {
                    depot: depot_point,
                    locations: location_points,
                })
            }
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// A validated request: one depot and between one and the configured maximum
/// number of visit locations.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRequest {
    depot: GeoPoint,
    locations: Vec<GeoPoint>,
}

impl OptimizationRequest {
    /// Build a request from already validated points.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the location count falls outside
    /// `limits`.
    pub fn new(
        depot: GeoPoint,
        locations: Vec<GeoPoint>,
        limits: &RequestLimits,
    ) -> Result<Self, ValidationError> {
        if !limits.allows(locations.len()) {
            return Err(ValidationError::new(vec![Violation::LocationCount {
                count: locations.len(),
                max: limits.max_locations,
            }]));
        }
        Ok(Self { depot, locations })
    }

    /// Start and end point of the tour.
    #[must_use]
    pub const fn depot(&self) -> GeoPoint {
        self.depot
    }

    /// Visit locations in request order.
    #[must_use]
    pub fn locations(&self) -> &[GeoPoint] {
        &self.locations
    }

    /// Indexed coordinate list with the depot at node 0.
    #[must_use]
    pub fn coordinates(&self) -> CoordinateList {
        CoordinateList::new(self.depot, &self.locations)
    }
}

/// Depot followed by the visit locations.
///
/// Node 0 is the depot and node `i >= 1` is `locations[i - 1]`; distance
/// matrices and tours index into this list.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateList {
    points: Vec<GeoPoint>,
}

impl CoordinateList {
    /// Build the list from a depot and visit locations.
    #[must_use]
    pub fn new(depot: GeoPoint, locations: &[GeoPoint]) -> Self {
        let mut points = Vec::with_capacity(locations.len() + 1);
        points.push(depot);
        points.extend_from_slice(locations);
        Self { points }
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: the depot is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The depot (node 0).
    #[must_use]
    pub fn depot(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    /// All nodes in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.points
    }

    /// The closed waypoint sequence for a tour: the depot, the locations in
    /// tour order, then the depot again.
    ///
    /// An empty tour yields `[depot, depot]`.
    #[must_use]
    pub fn closed_tour(&self, solution: &TourSolution) -> Vec<GeoPoint> {
        let Some(depot) = self.depot() else {
            return Vec::new();
        };
        let mut waypoints = Vec::with_capacity(solution.order().len() + 2);
        waypoints.push(depot);
        for &location in solution.order() {
            match self.points.get(location + 1) {
                Some(point) => waypoints.push(*point),
                None => {
                    log::warn!("tour references unknown location {location}; skipping");
                    debug_assert!(false, "tour references unknown location {location}");
                }
            }
        }
        waypoints.push(depot);
        waypoints
    }
}
