//! First-solution heuristic.

use tourgate_core::DistanceMatrix;

/// Build a tour by repeatedly following the cheapest arc out of the last
/// visited node.
///
/// Returns the visited node indices, excluding the depot (node 0). Ties go
/// to the lowest node index.
pub(crate) fn path_cheapest_arc(matrix: &DistanceMatrix) -> Vec<usize> {
    let size = matrix.size();
    let mut visited = vec![false; size];
    if let Some(depot) = visited.first_mut() {
        *depot = true;
    }

    let mut tour = Vec::with_capacity(size.saturating_sub(1));
    let mut current = 0;
    while let Some(next) = cheapest_unvisited(matrix, current, &visited) {
        if let Some(flag) = visited.get_mut(next) {
            *flag = true;
        }
        tour.push(next);
        current = next;
    }
    tour
}

fn cheapest_unvisited(matrix: &DistanceMatrix, from: usize, visited: &[bool]) -> Option<usize> {
    visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(node, _)| (matrix.cost(from, node), node))
        .min()
        .map(|(_, node)| node)
}
