//! Tour solutions and the solver seam.

use std::sync::Arc;
use std::time::Duration;

use crate::DistanceMatrix;

/// A visiting order over the locations together with its total cost.
///
/// `order` holds location indices (node index minus one). The total is
/// always recomputed from the matrix, so it equals the literal sum of the
/// arcs along depot, the locations in order, and back to the depot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TourSolution {
    order: Vec<usize>,
    total_distance: u64,
}

impl TourSolution {
    /// The empty tour: no locations, zero cost.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            order: Vec::new(),
            total_distance: 0,
        }
    }

    /// Build a solution from a visiting order, pricing it with `matrix`.
    #[must_use]
    pub fn from_order(order: Vec<usize>, matrix: &DistanceMatrix) -> Self {
        let total_distance = matrix.tour_cost(&order);
        Self {
            order,
            total_distance,
        }
    }

    /// Location indices in visiting order.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Total cost of the closed tour.
    #[must_use]
    pub const fn total_distance(&self) -> u64 {
        self.total_distance
    }

    /// Whether the tour visits no locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the order visits each of `0..location_count` exactly once.
    #[must_use]
    pub fn is_permutation_of(&self, location_count: usize) -> bool {
        if self.order.len() != location_count {
            return false;
        }
        let mut seen = vec![false; location_count];
        self.order.iter().all(|&location| {
            seen.get_mut(location)
                .is_some_and(|visited| !std::mem::replace(visited, true))
        })
    }

    /// Consume the solution, returning the order and total.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, u64) {
        (self.order, self.total_distance)
    }
}

/// Solutions for matrices too small to need a search.
///
/// Returns the empty tour for zero or one node, the single round trip for two
/// nodes, and `None` otherwise.
#[must_use]
pub fn trivial_solution(matrix: &DistanceMatrix) -> Option<TourSolution> {
    match matrix.size() {
        0 | 1 => Some(TourSolution::empty()),
        2 => Some(TourSolution::from_order(vec![0], matrix)),
        _ => None,
    }
}

/// Compute a near-optimal closed tour from the depot through every location.
///
/// Implementations must return either an order visiting each location of
/// `matrix` exactly once, or [`TourSolution::empty`] when no tour could be
/// found within `budget`. The budget is a wall-clock limit on the search.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tourgate_core::{DistanceMatrix, TourSolution, TourSolver};
///
/// struct InputOrder;
///
/// impl TourSolver for InputOrder {
///     fn solve(&self, matrix: &DistanceMatrix, _budget: Duration) -> TourSolution {
///         TourSolution::from_order((0..matrix.location_count()).collect(), matrix)
///     }
/// }
///
/// let matrix = DistanceMatrix::new(vec![vec![0, 4], vec![6, 0]]).expect("square");
/// let tour = InputOrder.solve(&matrix, Duration::from_millis(10));
/// assert_eq!(tour.total_distance(), 10);
/// ```
pub trait TourSolver: Send + Sync {
    /// Solve the tour for `matrix` within `budget`.
    fn solve(&self, matrix: &DistanceMatrix, budget: Duration) -> TourSolution;
}

impl<T: TourSolver + ?Sized> TourSolver for Arc<T> {
    fn solve(&self, matrix: &DistanceMatrix, budget: Duration) -> TourSolution {
        (**self).solve(matrix, budget)
    }
}

impl<T: TourSolver + ?Sized> TourSolver for Box<T> {
    fn solve(&self, matrix: &DistanceMatrix, budget: Duration) -> TourSolution {
        (**self).solve(matrix, budget)
    }
}
