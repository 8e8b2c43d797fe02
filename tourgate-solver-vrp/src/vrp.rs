//! `vrp-core` modelling helpers for `VrpTourSolver`.
//!
//! This module converts a distance matrix into a single-vehicle `vrp-core`
//! problem with one required job per location, runs the solver, and
//! translates the resulting tour back into location indices.

use std::sync::Arc;

use tourgate_core::DistanceMatrix;
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    location_count: usize,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = (1..=location_count)
        .map(|node| {
            SingleBuilder::default()
                .id(format!("location{node}").as_str())
                .location(node)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("vehicle")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(0)
                .set_end_location(0)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Matrix-backed transport costs; distance and duration share one table.
struct MatrixTransportCost {
    costs: Vec<Vec<f64>>,
}

impl MatrixTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "vrp-core prices arcs in f64; road distances stay far below 2^53 metres"
    )]
    fn new(matrix: &DistanceMatrix) -> Self {
        let costs = matrix
            .rows()
            .map(|row| row.iter().map(|&cost| cost as f64).collect())
            .collect();
        Self { costs }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for MatrixTransportCost {
    // The route and departure parameters belong to `vrp-core`'s shared
    // signature; a static matrix ignores them.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

/// Search limits for one `vrp-core` run.
pub(super) struct VrpLimits {
    pub max_generations: usize,
    pub max_seconds: usize,
}

/// Solve the tour for `matrix`, returning location indices in visiting order.
///
/// Returns `Ok(None)` when the best solution leaves any location unassigned.
pub(super) fn solve_tour(
    matrix: &DistanceMatrix,
    limits: &VrpLimits,
) -> GenericResult<Option<Vec<usize>>> {
    let transport = Arc::new(MatrixTransportCost::new(matrix));
    let goal = define_goal(transport.clone())?;
    let problem = Arc::new(define_problem(matrix.location_count(), transport, goal)?);

    let config = VrpConfigBuilder::new(problem.clone())
        .prebuild()?
        .with_max_generations(Some(limits.max_generations))
        .with_max_time(Some(limits.max_seconds))
        .build()?;

    let solution = vrp_core::solver::Solver::new(problem, config).solve()?;
    if !solution.unassigned.is_empty() {
        return Ok(None);
    }

    let order = solution
        .get_locations()
        .flatten()
        .filter(|&location| location != 0)
        .map(|location| location - 1)
        .collect();
    Ok(Some(order))
}
