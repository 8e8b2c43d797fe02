//! Fetch distances and leg geometries from a routing service.
//!
//! The [`DistanceMatrixProvider`] trait returns the pairwise cost matrix for
//! a [`CoordinateList`](crate::CoordinateList), and the
//! [`RouteGeometryProvider`] trait returns one encoded polyline per leg of a
//! closed waypoint sequence. Both are synchronous so the pipeline stays
//! embeddable outside an async runtime.
//!
//! Every failure is a [`RoutingError`] carrying the upstream cause.

mod error;
mod provider;

pub use error::RoutingError;
pub use provider::{DistanceMatrixProvider, LegGeometries, RouteGeometryProvider};
