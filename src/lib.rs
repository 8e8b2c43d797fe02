//! Facade crate for the Tourgate route optimisation gateway.
//!
//! This crate re-exports the core domain types and exposes the bundled tour
//! solvers and the HTTP routing provider behind feature flags.

#![forbid(unsafe_code)]

pub use tourgate_core::{
    CoordinateList, DistanceMatrix, DistanceMatrixProvider, GeoPoint, LegGeometries, MatrixError,
    OptimizationRequest, OptimizationResult, OptimizeError, OptimizePayload, Optimizer,
    OptimizerConfig, RequestLimits, RouteGeometryProvider, RouteOptimizer, RoutingError,
    TourSolution, TourSolver, ValidationError,
};

#[cfg(feature = "http-routing")]
pub use tourgate_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};

#[cfg(feature = "solver-gls")]
pub use tourgate_solver_gls::{GlsConfig, GuidedLocalSearchSolver};

#[cfg(feature = "solver-vrp")]
pub use tourgate_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};
