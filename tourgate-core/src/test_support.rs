//! Deterministic providers and solvers used by unit and behaviour tests.
//!
//! Nothing here talks to the network; the stubs return pre-configured
//! responses and count how often they were called so tests can assert that
//! a pipeline stage was skipped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::{
    CoordinateList, DistanceMatrix, DistanceMatrixProvider, GeoPoint, LegGeometries,
    RouteGeometryProvider, RoutingError, TourSolution, TourSolver, trivial_solution,
};

/// Stub `DistanceMatrixProvider` returning a fixed matrix or error.
///
/// The configured matrix is returned regardless of the coordinates supplied,
/// as long as the input is non-empty.
#[derive(Debug)]
pub struct StubMatrixProvider {
    response: Result<Vec<Vec<u64>>, RoutingError>,
    calls: AtomicUsize,
}

impl StubMatrixProvider {
    /// Provider returning `rows` for every request.
    #[must_use]
    pub const fn with_matrix(rows: Vec<Vec<u64>>) -> Self {
        Self {
            response: Ok(rows),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider failing every request with `error`.
    #[must_use]
    pub const fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the provider has been called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistanceMatrixProvider for StubMatrixProvider {
    fn distance_matrix(
        &self,
        coordinates: &CoordinateList,
    ) -> Result<DistanceMatrix, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if coordinates.is_empty() {
            return Err(RoutingError::EmptyInput);
        }
        match &self.response {
            Ok(rows) => DistanceMatrix::new(rows.clone()).map_err(|err| {
                RoutingError::InvalidMatrix {
                    message: err.to_string(),
                }
            }),
            Err(error) => Err(error.clone()),
        }
    }
}

/// `DistanceMatrixProvider` sizing a uniform matrix to each request: zero on
/// the diagonal, `cost` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct UniformMatrixProvider {
    cost: u64,
}

impl UniformMatrixProvider {
    /// Provider charging `cost` for every arc between distinct nodes.
    #[must_use]
    pub const fn new(cost: u64) -> Self {
        Self { cost }
    }
}

impl DistanceMatrixProvider for UniformMatrixProvider {
    fn distance_matrix(
        &self,
        coordinates: &CoordinateList,
    ) -> Result<DistanceMatrix, RoutingError> {
        if coordinates.is_empty() {
            return Err(RoutingError::EmptyInput);
        }
        let n = coordinates.len();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0 } else { self.cost }).collect())
            .collect();
        DistanceMatrix::new(rows).map_err(|err| RoutingError::InvalidMatrix {
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
enum GeometryResponse {
    PerLeg,
    Fixed(LegGeometries),
    Error(RoutingError),
}

/// Stub `RouteGeometryProvider` recording the waypoints it was asked for.
#[derive(Debug)]
pub struct StubGeometryProvider {
    response: GeometryResponse,
    calls: AtomicUsize,
    last_waypoints: Mutex<Vec<GeoPoint>>,
}

impl StubGeometryProvider {
    const fn from_response(response: GeometryResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            last_waypoints: Mutex::new(Vec::new()),
        }
    }

    /// Provider answering `poly0`, `poly1`, ... with one entry per leg.
    #[must_use]
    pub const fn per_leg() -> Self {
        Self::from_response(GeometryResponse::PerLeg)
    }

    /// Provider returning `geometries` for every request.
    #[must_use]
    pub const fn with_geometries(geometries: LegGeometries) -> Self {
        Self::from_response(GeometryResponse::Fixed(geometries))
    }

    /// Provider failing every request with `error`.
    #[must_use]
    pub const fn with_error(error: RoutingError) -> Self {
        Self::from_response(GeometryResponse::Error(error))
    }

    /// Number of times the provider has been called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Waypoints passed to the most recent call.
    #[must_use]
    pub fn last_waypoints(&self) -> Vec<GeoPoint> {
        self.last_waypoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteGeometryProvider for StubGeometryProvider {
    fn leg_geometries(&self, waypoints: &[GeoPoint]) -> Result<LegGeometries, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_waypoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = waypoints.to_vec();
        if waypoints.len() < 2 {
            return Err(RoutingError::EmptyInput);
        }
        match &self.response {
            GeometryResponse::PerLeg => Ok((0..waypoints.len() - 1)
                .map(|leg| format!("poly{leg}"))
                .collect()),
            GeometryResponse::Fixed(geometries) => Ok(geometries.clone()),
            GeometryResponse::Error(error) => Err(error.clone()),
        }
    }
}

/// `TourSolver` visiting locations in input order.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputOrderSolver;

impl TourSolver for InputOrderSolver {
    fn solve(&self, matrix: &DistanceMatrix, _budget: Duration) -> TourSolution {
        trivial_solution(matrix).unwrap_or_else(|| {
            TourSolution::from_order((0..matrix.location_count()).collect(), matrix)
        })
    }
}

/// `TourSolver` returning a caller-chosen order.
#[derive(Debug, Clone)]
pub struct FixedOrderSolver {
    order: Vec<usize>,
}

impl FixedOrderSolver {
    /// Solver always answering with `order`.
    #[must_use]
    pub const fn new(order: Vec<usize>) -> Self {
        Self { order }
    }
}

impl TourSolver for FixedOrderSolver {
    fn solve(&self, matrix: &DistanceMatrix, _budget: Duration) -> TourSolution {
        TourSolution::from_order(self.order.clone(), matrix)
    }
}

/// `TourSolver` that never finds a tour.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustedSolver;

impl TourSolver for ExhaustedSolver {
    fn solve(&self, _matrix: &DistanceMatrix, _budget: Duration) -> TourSolution {
        TourSolution::empty()
    }
}
