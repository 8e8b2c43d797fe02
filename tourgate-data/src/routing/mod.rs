//! HTTP routing providers for OSRM-compatible services.
//!
//! This module provides [`HttpRoutingProvider`], which implements both
//! [`tourgate_core::DistanceMatrixProvider`] (OSRM Table service) and
//! [`tourgate_core::RouteGeometryProvider`] (OSRM Route service).
//!
//! # Architecture
//!
//! Both traits are synchronous so the core pipeline stays embeddable in
//! synchronous contexts. The provider blocks on its async HTTP calls
//! internally, reusing the caller's multi-threaded Tokio runtime when there
//! is one.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tourgate_core::{CoordinateList, DistanceMatrixProvider, GeoPoint};
//! use tourgate_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
//!
//! let config = HttpRoutingProviderConfig::new("http://localhost:5000")
//!     .with_connect_timeout(Duration::from_secs(3))
//!     .with_read_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRoutingProvider::with_config(config)?;
//!
//! let depot = GeoPoint::new(51.5, -0.1)?;
//! let stop = GeoPoint::new(51.6, -0.2)?;
//! let matrix = provider.distance_matrix(&CoordinateList::new(depot, &[stop]))?;
//! println!("depot to stop: {} m", matrix.cost(0, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use osrm::encode_coordinates;
pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpRoutingProvider,
    HttpRoutingProviderConfig, ProviderBuildError,
};
