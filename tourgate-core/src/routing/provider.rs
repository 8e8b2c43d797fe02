//! Provider traits for distance matrices and route geometries.

use std::sync::Arc;

use crate::{CoordinateList, DistanceMatrix, GeoPoint};

use super::error::RoutingError;

/// Encoded polylines, one per leg of a route, in leg order.
pub type LegGeometries = Vec<String>;

/// Fetch the pairwise distance matrix for a coordinate list.
///
/// Implementers must return a square `n x n` matrix where
/// `n == coordinates.len()`; `cost(i, j)` is the distance from node `i` to
/// node `j`.
///
/// # Examples
///
/// ```rust
/// use tourgate_core::{
///     CoordinateList, DistanceMatrix, DistanceMatrixProvider, GeoPoint, RoutingError,
/// };
///
/// struct UnitProvider;
///
/// impl DistanceMatrixProvider for UnitProvider {
///     fn distance_matrix(
///         &self,
///         coordinates: &CoordinateList,
///     ) -> Result<DistanceMatrix, RoutingError> {
///         if coordinates.is_empty() {
///             return Err(RoutingError::EmptyInput);
///         }
///         let n = coordinates.len();
///         let rows = (0..n)
///             .map(|i| (0..n).map(|j| u64::from(i != j)).collect())
///             .collect();
///         DistanceMatrix::new(rows).map_err(|err| RoutingError::InvalidMatrix {
///             message: err.to_string(),
///         })
///     }
/// }
///
/// let depot = GeoPoint::new(0.0, 0.0).expect("valid point");
/// let stop = GeoPoint::new(1.0, 1.0).expect("valid point");
/// let matrix = UnitProvider.distance_matrix(&CoordinateList::new(depot, &[stop]))?;
/// assert_eq!(matrix.size(), 2);
/// # Ok::<(), RoutingError>(())
/// ```
pub trait DistanceMatrixProvider {
    /// Return the distance matrix for `coordinates`.
    ///
    /// Implementations must return `Err(RoutingError::EmptyInput)` when
    /// `coordinates` is empty.
    fn distance_matrix(&self, coordinates: &CoordinateList)
    -> Result<DistanceMatrix, RoutingError>;
}

/// Fetch the road geometry of each leg of a route through `waypoints`.
///
/// A route through `k` waypoints has `k - 1` legs.
pub trait RouteGeometryProvider {
    /// Return one encoded polyline per leg.
    ///
    /// Implementations must return `Err(RoutingError::EmptyInput)` when
    /// fewer than two waypoints are supplied.
    fn leg_geometries(&self, waypoints: &[GeoPoint]) -> Result<LegGeometries, RoutingError>;
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for Arc<T> {
    fn distance_matrix(
        &self,
        coordinates: &CoordinateList,
    ) -> Result<DistanceMatrix, RoutingError> {
        (**self).distance_matrix(coordinates)
    }
}

impl<T: RouteGeometryProvider + ?Sized> RouteGeometryProvider for Arc<T> {
    fn leg_geometries(&self, waypoints: &[GeoPoint]) -> Result<LegGeometries, RoutingError> {
        (**self).leg_geometries(waypoints)
    }
}
