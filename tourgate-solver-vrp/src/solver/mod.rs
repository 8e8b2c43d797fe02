//! `VrpTourSolver` implementation backed by `vrp-core`.

use std::time::{Duration, Instant};

use tourgate_core::{DistanceMatrix, TourSolution, TourSolver, trivial_solution};

use crate::vrp::{VrpLimits, solve_tour};

/// Configuration for [`VrpTourSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpTourSolverConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
}

impl Default for VrpTourSolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 200,
        }
    }
}

/// Tour solver using the `vrp-core` metaheuristic.
#[derive(Debug, Clone, Default)]
pub struct VrpTourSolver {
    config: VrpTourSolverConfig,
}

impl VrpTourSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VrpTourSolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpTourSolverConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpTourSolverConfig {
        &self.config
    }
}

/// Whole seconds that fit inside `budget`; `None` below one second.
///
/// `vrp-core` only takes whole-second time limits, so the budget is floored.
fn budget_seconds(budget: Duration) -> Option<usize> {
    let seconds = usize::try_from(budget.as_secs()).unwrap_or(usize::MAX);
    (seconds > 0).then_some(seconds)
}

/// Nearest-neighbour tour from the depot, as location indices.
fn nearest_neighbour_order(matrix: &DistanceMatrix) -> Vec<usize> {
    let mut remaining: Vec<usize> = (1..=matrix.location_count()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = 0;
    loop {
        let Some((position, next)) = remaining
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(_, node)| matrix.cost(current, node))
        else {
            break;
        };
        remaining.swap_remove(position);
        order.push(next - 1);
        current = next;
    }
    order
}

impl TourSolver for VrpTourSolver {
    fn solve(&self, matrix: &DistanceMatrix, budget: Duration) -> TourSolution {
        if let Some(solution) = trivial_solution(matrix) {
            return solution;
        }

        let Some(max_seconds) = budget_seconds(budget) else {
            log::debug!("budget {budget:?} is under a second; using the nearest-neighbour tour");
            return TourSolution::from_order(nearest_neighbour_order(matrix), matrix);
        };

        let started_at = Instant::now();
        let limits = VrpLimits {
            max_generations: self.config.max_generations,
            max_seconds,
        };
        match solve_tour(matrix, &limits) {
            Ok(Some(order)) => {
                let solution = TourSolution::from_order(order, matrix);
                if solution.is_permutation_of(matrix.location_count()) {
                    log::debug!(
                        "vrp-core solved {} locations in {:?}",
                        matrix.location_count(),
                        started_at.elapsed()
                    );
                    solution
                } else {
                    log::warn!("vrp-core returned an incomplete tour: {:?}", solution.order());
                    TourSolution::empty()
                }
            }
            Ok(None) => {
                log::warn!("vrp-core left locations unassigned");
                TourSolution::empty()
            }
            Err(err) => {
                log::warn!("vrp-core failed: {err}");
                TourSolution::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests;
