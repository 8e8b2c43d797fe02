//! Core domain types for the Tourgate route optimisation gateway.
//!
//! The crate owns the validated request model, the distance matrix and tour
//! types, and the three seams the optimisation pipeline is built from:
//! [`DistanceMatrixProvider`], [`TourSolver`] and [`RouteGeometryProvider`].
//! [`Optimizer`] wires them together into the validate, measure, solve and
//! trace sequence behind the public endpoint.
//!
//! Constructors return `Result` to surface invalid input early; once a value
//! exists it upholds its invariants.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod geo_point;
mod matrix;
mod optimizer;
mod request;
pub mod routing;
mod solver;

#[doc(hidden)]
pub mod test_support;

pub use geo_point::{GeoPoint, ValidationError, Violation};
pub use matrix::{DistanceMatrix, MatrixError};
pub use optimizer::{
    DEFAULT_SOLVER_TIME_LIMIT, OptimizationResult, OptimizeError, Optimizer, OptimizerConfig,
    RouteOptimizer,
};
pub use request::{
    CoordinateList, DEFAULT_MAX_LOCATIONS, LatLng, OptimizationRequest, OptimizePayload,
    RequestLimits,
};
pub use routing::{DistanceMatrixProvider, LegGeometries, RouteGeometryProvider, RoutingError};
pub use solver::{TourSolution, TourSolver, trivial_solution};
