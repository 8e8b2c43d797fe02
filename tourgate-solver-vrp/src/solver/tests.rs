//! Unit tests for the `vrp-core` tour solver.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use rstest::{fixture, rstest};
use tourgate_core::{DistanceMatrix, TourSolver};

use super::{VrpTourSolver, VrpTourSolverConfig, budget_seconds, nearest_neighbour_order};

const BUDGET: Duration = Duration::from_secs(2);

fn matrix(rows: Vec<Vec<u64>>) -> DistanceMatrix {
    DistanceMatrix::new(rows).expect("square matrix")
}

fn quick_solver() -> VrpTourSolver {
    VrpTourSolver::with_config(VrpTourSolverConfig {
        max_generations: 50,
    })
}

#[fixture]
fn solver() -> VrpTourSolver {
    quick_solver()
}

#[rstest]
#[case::zero(Duration::ZERO, None)]
#[case::sub_second(Duration::from_millis(999), None)]
#[case::exact(Duration::from_secs(3), Some(3))]
#[case::rounds_down(Duration::from_millis(3_999), Some(3))]
fn budget_floors_to_whole_seconds(#[case] budget: Duration, #[case] expected: Option<usize>) {
    assert_eq!(budget_seconds(budget), expected);
}

#[rstest]
fn nearest_neighbour_follows_cheapest_arcs() {
    let costs = matrix(vec![
        vec![0, 9, 2, 7],
        vec![3, 0, 8, 8],
        vec![9, 9, 0, 1],
        vec![9, 4, 9, 0],
    ]);

    assert_eq!(nearest_neighbour_order(&costs), vec![1, 2, 0]);
}

#[rstest]
fn sub_second_budget_returns_within_the_budget() {
    let solver = VrpTourSolver::with_config(VrpTourSolverConfig {
        max_generations: 1_000_000,
    });
    let costs = matrix(
        (0..12_u64)
            .map(|row| (0..12_u64).map(|col| row.abs_diff(col) * 7 + row).collect())
            .collect(),
    );
    let budget = Duration::from_millis(100);

    let started_at = Instant::now();
    let solution = solver.solve(&costs, budget);

    assert!(
        started_at.elapsed() < budget,
        "took {:?}",
        started_at.elapsed()
    );
    assert!(solution.is_permutation_of(11));
    assert_eq!(solution.total_distance(), costs.tour_cost(solution.order()));
}

#[rstest]
#[case::empty(0)]
#[case::depot_only(1)]
fn no_locations_skip_the_search(solver: VrpTourSolver, #[case] size: usize) {
    let solution = solver.solve(&matrix(vec![vec![0; size]; size]), BUDGET);

    assert!(solution.is_empty());
    assert_eq!(solution.total_distance(), 0);
}

#[rstest]
fn single_location_is_a_round_trip(solver: VrpTourSolver) {
    let solution = solver.solve(&matrix(vec![vec![0, 3], vec![4, 0]]), BUDGET);

    assert_eq!(solution.order(), &[0]);
    assert_eq!(solution.total_distance(), 7);
}

#[rstest]
fn respects_asymmetric_costs(solver: VrpTourSolver) {
    let costs = matrix(vec![vec![0, 10, 20], vec![12, 0, 5], vec![25, 6, 0]]);

    let solution = solver.solve(&costs, BUDGET);

    assert_eq!(solution.order(), &[1, 0]);
    assert_eq!(solution.total_distance(), 38);
}

#[rstest]
fn default_config_values() {
    assert_eq!(VrpTourSolver::new().config().max_generations, 200);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    /// Property: the order is a permutation priced by the matrix.
    #[test]
    fn solution_is_a_priced_permutation(
        rows in (3_usize..=6).prop_flat_map(|size| {
            prop::collection::vec(prop::collection::vec(1_u64..500, size), size)
        }),
    ) {
        let costs = matrix(rows);
        let solution = quick_solver().solve(&costs, BUDGET);

        prop_assert!(solution.is_permutation_of(costs.location_count()));
        prop_assert_eq!(solution.total_distance(), costs.tour_cost(solution.order()));
    }
}
