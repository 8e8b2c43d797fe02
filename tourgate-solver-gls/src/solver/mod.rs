//! `GuidedLocalSearchSolver` implementation of [`TourSolver`].

use std::time::{Duration, Instant};

use tourgate_core::{DistanceMatrix, TourSolution, TourSolver, trivial_solution};

use crate::construction::path_cheapest_arc;
use crate::search::{GuidedSearch, SearchLimits, tour_cost};

/// Configuration for [`GuidedLocalSearchSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlsConfig {
    /// Penalty coefficient in thousandths; `100` weighs one penalty unit at
    /// a tenth of the average arc cost of the first local optimum.
    pub penalty_factor_permille: u64,
    /// Upper bound on guided rounds. `None` leaves the budget and stall limit
    /// in charge.
    pub max_iterations: Option<usize>,
    /// Guided rounds without a new best tour before the search stops.
    pub stall_limit: usize,
}

impl Default for GlsConfig {
    fn default() -> Self {
        Self {
            penalty_factor_permille: 100,
            max_iterations: None,
            stall_limit: 100,
        }
    }
}

/// Travelling-salesman solver using guided local search.
///
/// The depot is node 0 and costs may be asymmetric. Matrices with fewer than
/// three nodes are answered directly without searching.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tourgate_core::{DistanceMatrix, TourSolver};
/// use tourgate_solver_gls::GuidedLocalSearchSolver;
///
/// let matrix = DistanceMatrix::new(vec![
///     vec![0, 10, 20],
///     vec![12, 0, 5],
///     vec![25, 6, 0],
/// ])
/// .expect("square matrix");
///
/// let solution = GuidedLocalSearchSolver::new().solve(&matrix, Duration::from_secs(1));
/// assert_eq!(solution.order(), &[1, 0]);
/// assert_eq!(solution.total_distance(), 38);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuidedLocalSearchSolver {
    config: GlsConfig,
}

impl GuidedLocalSearchSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GlsConfig::default())
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: GlsConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GlsConfig {
        &self.config
    }
}

impl TourSolver for GuidedLocalSearchSolver {
    fn solve(&self, matrix: &DistanceMatrix, budget: Duration) -> TourSolution {
        if let Some(solution) = trivial_solution(matrix) {
            return solution;
        }

        let started_at = Instant::now();
        // A budget past the clock's range has no deadline.
        let deadline = started_at.checked_add(budget);
        let initial = path_cheapest_arc(matrix);
        let initial_cost = tour_cost(matrix, &initial);

        let limits = SearchLimits {
            deadline,
            max_iterations: self.config.max_iterations,
            stall_limit: self.config.stall_limit,
            penalty_factor_permille: self.config.penalty_factor_permille,
        };
        let outcome = GuidedSearch::new(matrix, initial, limits).run();

        log::debug!(
            "guided local search: {} locations, cost {} -> {} after {} rounds ({:?}, {:?})",
            matrix.location_count(),
            initial_cost,
            outcome.cost,
            outcome.rounds,
            outcome.stop,
            started_at.elapsed(),
        );

        let order = outcome.tour.iter().map(|node| node - 1).collect();
        TourSolution::from_order(order, matrix)
    }
}
