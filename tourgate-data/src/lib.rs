//! External data sources for the Tourgate gateway.
//!
//! The [`routing`] module talks to an OSRM-compatible routing service to
//! obtain distance matrices and leg geometries.

#![forbid(unsafe_code)]

pub mod routing;
