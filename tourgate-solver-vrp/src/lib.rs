//! Alternative tour solver for Tourgate backed by `vrp-core`.
//!
//! This crate provides [`VrpTourSolver`], a
//! [`TourSolver`](tourgate_core::TourSolver) that models the tour as a
//! single-vehicle VRP: every location is a required job, the vehicle starts
//! and ends at the depot, and the goal minimises unassigned jobs first and
//! travelled distance second. The `vrp-core` metaheuristic runs for the
//! whole seconds that fit in the request's time budget; budgets under one
//! second get a nearest-neighbour tour instead.
//!
//! Modelling or solver errors, and solutions leaving any job unassigned,
//! degrade to the empty tour with a warning.

#![forbid(unsafe_code)]

mod solver;
mod vrp;

pub use solver::{VrpTourSolver, VrpTourSolverConfig};
