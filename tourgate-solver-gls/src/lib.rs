//! Native travelling-salesman engine for Tourgate.
//!
//! This crate provides [`GuidedLocalSearchSolver`], the default
//! [`TourSolver`](tourgate_core::TourSolver). It builds a first tour with a
//! path-cheapest-arc heuristic, improves it by local search descent over
//! or-opt, exchange and 2-opt moves, then escapes local optima with guided
//! local search until the wall-clock budget runs out or the search stalls.
//!
//! All cost arithmetic is integral, so for a given matrix the result is
//! deterministic whenever the deadline is not reached.

#![forbid(unsafe_code)]

mod construction;
mod search;
mod solver;

pub use solver::{GlsConfig, GuidedLocalSearchSolver};
