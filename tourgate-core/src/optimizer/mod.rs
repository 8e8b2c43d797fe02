//! The optimisation pipeline: validate, measure, solve, trace.
//!
//! [`Optimizer`] runs the stages strictly in order and short-circuits on the
//! first failure:
//!
//! 1. validate the payload into an [`OptimizationRequest`];
//! 2. re-check the location count against the configured limits;
//! 3. fetch the distance matrix for depot plus locations;
//! 4. solve the tour within the solver time limit;
//! 5. fetch one geometry per leg of the closed tour;
//! 6. assemble the [`OptimizationResult`].

mod error;

use std::time::{Duration, Instant};

pub use error::OptimizeError;

use crate::{
    DistanceMatrixProvider, LegGeometries, OptimizationRequest, OptimizePayload, RequestLimits,
    RouteGeometryProvider, RoutingError, TourSolver,
};

/// Solver wall-clock budget when none is configured.
pub const DEFAULT_SOLVER_TIME_LIMIT: Duration = Duration::from_millis(3000);

/// The outcome of a successful optimisation.
///
/// `route` holds location indices in visiting order; the depot is implicit
/// at both ends. `route_geometries` has one entry per leg, so its length is
/// `route.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// Location indices in visiting order.
    pub route: Vec<usize>,
    /// Total cost of the closed tour in metres.
    pub total_distance: u64,
    /// Encoded polyline per leg.
    pub route_geometries: LegGeometries,
}

/// Configuration for [`Optimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Request bounds enforced by validation and the count guard.
    pub limits: RequestLimits,
    /// Wall-clock budget handed to the solver.
    pub solver_time_limit: Duration,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            limits: RequestLimits::default(),
            solver_time_limit: DEFAULT_SOLVER_TIME_LIMIT,
        }
    }
}

/// Object-safe view of an optimiser, so callers can hold
/// `Arc<dyn RouteOptimizer>` without naming the provider and solver types.
pub trait RouteOptimizer: Send + Sync {
    /// Run the full pipeline for `payload`.
    ///
    /// # Errors
    ///
    /// See [`OptimizeError`].
    fn optimize(&self, payload: &OptimizePayload) -> Result<OptimizationResult, OptimizeError>;

    /// Bounds applied to incoming requests.
    fn limits(&self) -> RequestLimits;
}

/// Orchestrates the routing providers and the tour solver.
///
/// The optimiser is generic over its three seams: a distance matrix
/// provider, a route geometry provider and a tour solver. One value that
/// implements both provider traits can serve both roles through `Arc`.
///
/// # Examples
///
/// ```
/// use tourgate_core::test_support::{InputOrderSolver, StubGeometryProvider, UniformMatrixProvider};
/// use tourgate_core::{LatLng, OptimizePayload, Optimizer};
///
/// let optimizer = Optimizer::new(
///     UniformMatrixProvider::new(100),
///     StubGeometryProvider::per_leg(),
///     InputOrderSolver,
/// );
/// let payload = OptimizePayload {
///     depot: LatLng { lat: 35.0, lng: 135.0 },
///     locations: vec![LatLng { lat: 35.1, lng: 135.2 }],
/// };
/// let result = optimizer.optimize(&payload).expect("stubs never fail");
/// assert_eq!(result.route, vec![0]);
/// assert_eq!(result.total_distance, 200);
/// assert_eq!(result.route_geometries, vec!["poly0", "poly1"]);
/// ```
#[derive(Debug)]
pub struct Optimizer<M, G, S> {
    matrix_provider: M,
    geometry_provider: G,
    solver: S,
    config: OptimizerConfig,
}

impl<M, G, S> Optimizer<M, G, S>
where
    M: DistanceMatrixProvider,
    G: RouteGeometryProvider,
    S: TourSolver,
{
    /// Construct an optimiser using default configuration.
    pub fn new(matrix_provider: M, geometry_provider: G, solver: S) -> Self {
        Self::with_config(
            matrix_provider,
            geometry_provider,
            solver,
            OptimizerConfig::default(),
        )
    }

    /// Construct an optimiser with explicit configuration.
    pub const fn with_config(
        matrix_provider: M,
        geometry_provider: G,
        solver: S,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            matrix_provider,
            geometry_provider,
            solver,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Validate `payload` and run the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Validation`] for invalid payloads and the
    /// stage-specific variants described on [`optimize_request`].
    ///
    /// [`optimize_request`]: Self::optimize_request
    pub fn optimize(&self, payload: &OptimizePayload) -> Result<OptimizationResult, OptimizeError> {
        let request = payload.validate(&self.config.limits)?;
        self.optimize_request(&request)
    }

    /// Run the pipeline for an already validated request.
    ///
    /// # Errors
    ///
    /// - [`OptimizeError::InvalidLocationCount`] when the request holds more
    ///   locations than this optimiser's limits allow;
    /// - [`OptimizeError::Table`] when the matrix cannot be fetched or its
    ///   dimension does not match the request;
    /// - [`OptimizeError::Route`] when the leg geometries cannot be fetched.
    pub fn optimize_request(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, OptimizeError> {
        let started_at = Instant::now();
        let count = request.locations().len();
        let limits = self.config.limits;
        if !limits.allows(count) {
            return Err(OptimizeError::InvalidLocationCount {
                count,
                max: limits.max_locations,
            });
        }

        let coordinates = request.coordinates();
        log::debug!("fetching distance matrix for {} nodes", coordinates.len());
        let matrix = self
            .matrix_provider
            .distance_matrix(&coordinates)
            .map_err(|err| {
                log::warn!("distance matrix request failed: {err}");
                OptimizeError::Table(err)
            })?;
        if matrix.size() != coordinates.len() {
            let err = RoutingError::InvalidMatrix {
                message: format!(
                    "expected {n}x{n} matrix, got {m}x{m}",
                    n = coordinates.len(),
                    m = matrix.size()
                ),
            };
            log::warn!("distance matrix rejected: {err}");
            return Err(OptimizeError::Table(err));
        }

        let solve_started = Instant::now();
        let solution = self.solver.solve(&matrix, self.config.solver_time_limit);
        log::debug!(
            "solved {count} locations in {:?} with total distance {}",
            solve_started.elapsed(),
            solution.total_distance()
        );
        if solution.is_empty() {
            log::warn!("solver found no tour for {count} locations; returning an empty route");
        }

        let waypoints = coordinates.closed_tour(&solution);
        log::debug!("fetching geometries for {} legs", waypoints.len().saturating_sub(1));
        let route_geometries = self
            .geometry_provider
            .leg_geometries(&waypoints)
            .map_err(|err| {
                log::warn!("route geometry request failed: {err}");
                OptimizeError::Route(err)
            })?;

        let (route, total_distance) = solution.into_parts();
        log::info!(
            "optimised {count} locations in {:?}: total distance {total_distance}",
            started_at.elapsed()
        );
        Ok(OptimizationResult {
            route,
            total_distance,
            route_geometries,
        })
    }
}

impl<M, G, S> RouteOptimizer for Optimizer<M, G, S>
where
    M: DistanceMatrixProvider + Send + Sync,
    G: RouteGeometryProvider + Send + Sync,
    S: TourSolver,
{
    fn optimize(&self, payload: &OptimizePayload) -> Result<OptimizationResult, OptimizeError> {
        Self::optimize(self, payload)
    }

    fn limits(&self) -> RequestLimits {
        self.config.limits
    }
}
