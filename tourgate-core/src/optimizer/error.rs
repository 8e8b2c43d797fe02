use thiserror::Error;

use crate::{RoutingError, ValidationError};

/// Errors returned by [`Optimizer::optimize`](super::Optimizer::optimize).
///
/// Each variant marks the pipeline stage that failed; later stages never
/// run once one fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// The payload failed coordinate or location-count validation.
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// The location count guard rejected a request that passed validation.
    #[error("location count must be between 1 and {max} (got {count})")]
    InvalidLocationCount {
        /// Number of locations supplied.
        count: usize,
        /// Configured upper bound.
        max: usize,
    },
    /// Fetching the distance matrix failed or returned the wrong dimension.
    #[error("routing table request failed: {0}")]
    Table(#[source] RoutingError),
    /// Fetching the leg geometries failed.
    #[error("routing route request failed: {0}")]
    Route(#[source] RoutingError),
}
