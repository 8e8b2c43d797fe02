//! Local search descent and guided local search.
//!
//! Tours are stored without the depot: `[a, b, c]` stands for the closed
//! tour `0 -> a -> b -> c -> 0`. Every cost is an integer, and the augmented
//! cost of an arc is `cost + lambda * penalty`.

mod moves;

use std::time::Instant;

use tourgate_core::DistanceMatrix;

use self::moves::{Move, neighbourhood};

/// Arc penalties accumulated by guided local search.
struct Penalties {
    size: usize,
    counts: Vec<u64>,
}

impl Penalties {
    fn new(size: usize) -> Self {
        Self {
            size,
            counts: vec![0; size.saturating_mul(size)],
        }
    }

    fn slot(&self, from: usize, to: usize) -> Option<usize> {
        (from < self.size && to < self.size).then(|| from * self.size + to)
    }

    fn get(&self, from: usize, to: usize) -> u64 {
        self.slot(from, to)
            .and_then(|slot| self.counts.get(slot))
            .copied()
            .unwrap_or(0)
    }

    fn increment(&mut self, from: usize, to: usize) {
        if let Some(count) = self
            .slot(from, to)
            .and_then(|slot| self.counts.get_mut(slot))
        {
            *count = count.saturating_add(1);
        }
    }
}

/// Iterate over the arcs of the closed tour through `tour`.
fn arcs(tour: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let nodes = std::iter::once(0).chain(tour.iter().copied());
    let successors = tour.iter().copied().chain(std::iter::once(0));
    nodes.zip(successors)
}

/// Real cost of the closed tour through `tour`.
pub(crate) fn tour_cost(matrix: &DistanceMatrix, tour: &[usize]) -> u64 {
    arcs(tour).fold(0_u64, |total, (from, to)| {
        total.saturating_add(matrix.cost(from, to))
    })
}

/// Limits shared by every phase of the search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchLimits {
    /// Wall-clock instant after which the search returns its best tour;
    /// `None` leaves the iteration and stall limits in charge.
    pub deadline: Option<Instant>,
    /// Maximum number of guided rounds, if bounded.
    pub max_iterations: Option<usize>,
    /// Guided rounds without a new best tour before giving up.
    pub stall_limit: usize,
    /// Penalty coefficient in thousandths.
    pub penalty_factor_permille: u64,
}

impl SearchLimits {
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Why the search stopped, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    Deadline,
    IterationLimit,
    Stalled,
    Optimal,
    NoGuidance,
}

/// Outcome of a guided search.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    pub tour: Vec<usize>,
    pub cost: u64,
    pub rounds: usize,
    pub stop: StopReason,
}

/// Guided local search over a complete, possibly asymmetric, matrix.
pub(crate) struct GuidedSearch<'a> {
    matrix: &'a DistanceMatrix,
    limits: SearchLimits,
    penalties: Penalties,
    lambda: u64,
    moves: Vec<Move>,
    scratch: Vec<usize>,
    best: Vec<usize>,
    best_cost: u64,
}

impl<'a> GuidedSearch<'a> {
    /// Prepare a search starting from `initial`.
    pub(crate) fn new(matrix: &'a DistanceMatrix, initial: Vec<usize>, limits: SearchLimits) -> Self {
        let best_cost = tour_cost(matrix, &initial);
        Self {
            matrix,
            limits,
            penalties: Penalties::new(matrix.size()),
            lambda: 0,
            moves: neighbourhood(initial.len()),
            scratch: Vec::with_capacity(initial.len()),
            best: initial,
            best_cost,
        }
    }

    fn augmented_arc(&self, from: usize, to: usize) -> u64 {
        self.matrix
            .cost(from, to)
            .saturating_add(self.lambda.saturating_mul(self.penalties.get(from, to)))
    }

    fn augmented_cost(&self, tour: &[usize]) -> u64 {
        arcs(tour).fold(0_u64, |total, (from, to)| {
            total.saturating_add(self.augmented_arc(from, to))
        })
    }

    fn offer_best(&mut self, tour: &[usize]) {
        let cost = tour_cost(self.matrix, tour);
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best.clear();
            self.best.extend_from_slice(tour);
        }
    }

    /// First-improvement descent on the augmented cost.
    ///
    /// Returns `false` when the deadline interrupted the descent.
    fn descend(&mut self, tour: &mut Vec<usize>) -> bool {
        let mut current = self.augmented_cost(tour);
        'restart: loop {
            for index in 0..self.moves.len() {
                if self.limits.expired() {
                    return false;
                }
                let Some(&mv) = self.moves.get(index) else {
                    break;
                };
                let mut candidate = std::mem::take(&mut self.scratch);
                mv.apply(tour, &mut candidate);
                let cost = self.augmented_cost(&candidate);
                if cost < current {
                    current = cost;
                    std::mem::swap(tour, &mut candidate);
                    self.scratch = candidate;
                    self.offer_best(tour);
                    continue 'restart;
                }
                self.scratch = candidate;
            }
            return true;
        }
    }

    /// Penalise the tour arcs of maximal utility `cost / (1 + penalty)`.
    ///
    /// Returns `false` when every arc has zero utility.
    fn penalise(&mut self, tour: &[usize]) -> bool {
        let mut chosen: Vec<(usize, usize)> = Vec::new();
        let mut top: Option<(u64, u64)> = None;
        for (from, to) in arcs(tour) {
            let utility = (
                self.matrix.cost(from, to),
                self.penalties.get(from, to).saturating_add(1),
            );
            if utility.0 == 0 {
                continue;
            }
            match top.map(|best| compare_utility(utility, best)) {
                Some(std::cmp::Ordering::Less) => {}
                Some(std::cmp::Ordering::Equal) => chosen.push((from, to)),
                Some(std::cmp::Ordering::Greater) | None => {
                    top = Some(utility);
                    chosen.clear();
                    chosen.push((from, to));
                }
            }
        }
        for (from, to) in &chosen {
            self.penalties.increment(*from, *to);
        }
        !chosen.is_empty()
    }

    /// Run descent followed by guided rounds until a stopping rule fires.
    pub(crate) fn run(mut self) -> SearchOutcome {
        let mut tour = self.best.clone();
        let mut rounds = 0;
        if !self.descend(&mut tour) {
            return self.finish(rounds, StopReason::Deadline);
        }
        if self.best_cost == 0 {
            return self.finish(rounds, StopReason::Optimal);
        }

        let arc_count = u64::try_from(tour.len().saturating_add(1)).unwrap_or(u64::MAX);
        self.lambda = self
            .limits
            .penalty_factor_permille
            .saturating_mul(self.best_cost)
            .checked_div(arc_count.saturating_mul(1000))
            .unwrap_or(0)
            .max(1);

        let mut stalled = 0;
        loop {
            if self.limits.expired() {
                return self.finish(rounds, StopReason::Deadline);
            }
            if self
                .limits
                .max_iterations
                .is_some_and(|limit| rounds >= limit)
            {
                return self.finish(rounds, StopReason::IterationLimit);
            }
            if stalled >= self.limits.stall_limit {
                return self.finish(rounds, StopReason::Stalled);
            }
            if !self.penalise(&tour) {
                return self.finish(rounds, StopReason::NoGuidance);
            }

            let before = self.best_cost;
            rounds += 1;
            if !self.descend(&mut tour) {
                return self.finish(rounds, StopReason::Deadline);
            }
            if self.best_cost < before {
                stalled = 0;
            } else {
                stalled += 1;
            }
        }
    }

    fn finish(self, rounds: usize, stop: StopReason) -> SearchOutcome {
        SearchOutcome {
            tour: self.best,
            cost: self.best_cost,
            rounds,
            stop,
        }
    }
}

/// Compare `cost_a / pen_a` with `cost_b / pen_b` exactly.
fn compare_utility(a: (u64, u64), b: (u64, u64)) -> std::cmp::Ordering {
    let lhs = u128::from(a.0) * u128::from(b.1);
    let rhs = u128::from(b.0) * u128::from(a.1);
    lhs.cmp(&rhs)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::{fixture, rstest};

    fn matrix(rows: Vec<Vec<u64>>) -> DistanceMatrix {
        DistanceMatrix::new(rows).expect("square matrix")
    }

    #[fixture]
    fn limits() -> SearchLimits {
        SearchLimits {
            deadline: Some(Instant::now() + Duration::from_secs(10)),
            max_iterations: None,
            stall_limit: 20,
            penalty_factor_permille: 100,
        }
    }

    #[rstest]
    fn tour_cost_closes_the_cycle() {
        let costs = matrix(vec![vec![0, 10, 20], vec![12, 0, 5], vec![25, 6, 0]]);

        assert_eq!(tour_cost(&costs, &[2, 1]), 38);
        assert_eq!(tour_cost(&costs, &[1, 2]), 40);
    }

    #[rstest]
    fn descent_reaches_the_asymmetric_optimum(limits: SearchLimits) {
        let costs = matrix(vec![vec![0, 10, 20], vec![12, 0, 5], vec![25, 6, 0]]);

        let outcome = GuidedSearch::new(&costs, vec![1, 2], limits).run();

        assert_eq!(outcome.tour, vec![2, 1]);
        assert_eq!(outcome.cost, 38);
    }

    #[rstest]
    fn zero_cost_tour_stops_immediately(limits: SearchLimits) {
        let costs = matrix(vec![vec![0; 4]; 4]);

        let outcome = GuidedSearch::new(&costs, vec![1, 2, 3], limits).run();

        assert_eq!(outcome.stop, StopReason::Optimal);
        assert_eq!(outcome.rounds, 0);
    }

    #[rstest]
    fn expired_deadline_returns_initial_tour(mut limits: SearchLimits) {
        limits.deadline = Some(Instant::now());
        let costs = matrix(vec![vec![0, 10, 20], vec![12, 0, 5], vec![25, 6, 0]]);

        let outcome = GuidedSearch::new(&costs, vec![1, 2], limits).run();

        assert_eq!(outcome.stop, StopReason::Deadline);
        assert_eq!(outcome.tour, vec![1, 2]);
        assert_eq!(outcome.cost, 40);
    }

    #[rstest]
    fn iteration_limit_bounds_guided_rounds(mut limits: SearchLimits) {
        limits.max_iterations = Some(3);
        limits.stall_limit = usize::MAX;
        let costs = matrix(vec![
            vec![0, 3, 9, 4],
            vec![5, 0, 2, 8],
            vec![7, 6, 0, 1],
            vec![2, 9, 4, 0],
        ]);

        let outcome = GuidedSearch::new(&costs, vec![1, 2, 3], limits).run();

        assert_eq!(outcome.stop, StopReason::IterationLimit);
        assert_eq!(outcome.rounds, 3);
        assert_eq!(outcome.cost, tour_cost(&costs, &outcome.tour));
    }

    #[rstest]
    fn penalises_every_arc_of_maximal_utility(limits: SearchLimits) {
        let costs = matrix(vec![vec![0, 7, 1], vec![1, 0, 7], vec![7, 1, 0]]);
        let mut search = GuidedSearch::new(&costs, vec![1, 2], limits);

        assert!(search.penalise(&[1, 2]));

        assert_eq!(search.penalties.get(0, 1), 1);
        assert_eq!(search.penalties.get(1, 2), 1);
        assert_eq!(search.penalties.get(2, 0), 1);
        assert_eq!(search.penalties.get(0, 2), 0);
    }

    #[rstest]
    fn utility_comparison_is_exact() {
        assert_eq!(compare_utility((10, 3), (7, 2)), std::cmp::Ordering::Less);
        assert_eq!(compare_utility((6, 2), (3, 1)), std::cmp::Ordering::Equal);
        assert_eq!(compare_utility((u64::MAX, 1), (1, 1)), std::cmp::Ordering::Greater);
    }
}
