//! Local search neighbourhoods over a tour of non-depot nodes.
//!
//! Moves are indexed by tour position, not node. Applying a move writes the
//! neighbouring tour into a scratch buffer so the caller can price it before
//! committing.

/// Longest segment relocated by an or-opt move.
pub(crate) const MAX_SEGMENT: usize = 3;

/// A single neighbourhood move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Lift `len` nodes starting at `start` and reinsert them before
    /// position `to` of the remaining tour.
    Relocate { start: usize, len: usize, to: usize },
    /// Exchange the nodes at two positions.
    Swap { first: usize, second: usize },
    /// Reverse the positions `first..=last`.
    Reverse { first: usize, last: usize },
}

impl Move {
    /// Write the tour produced by applying `self` to `tour` into `out`.
    pub(crate) fn apply(self, tour: &[usize], out: &mut Vec<usize>) {
        out.clear();
        match self {
            Self::Relocate { start, len, to } => {
                let end = start.saturating_add(len);
                let outside = tour
                    .iter()
                    .enumerate()
                    .filter(move |(position, _)| *position < start || *position >= end)
                    .map(|(_, &node)| node);
                out.extend(outside.clone().take(to));
                out.extend(tour.iter().skip(start).take(len).copied());
                out.extend(outside.skip(to));
            }
            Self::Swap { first, second } => {
                out.extend_from_slice(tour);
                if first < out.len() && second < out.len() {
                    out.swap(first, second);
                }
            }
            Self::Reverse { first, last } => {
                out.extend_from_slice(tour);
                if let Some(segment) = out.get_mut(first..=last) {
                    segment.reverse();
                }
            }
        }
    }
}

/// Every move for a tour of `len` nodes, in the fixed order the descent
/// tries them: or-opt by segment length, then exchanges, then reversals.
pub(crate) fn neighbourhood(len: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    for segment in 1..=MAX_SEGMENT.min(len) {
        let remaining = len - segment;
        for start in 0..=remaining {
            moves.extend(
                (0..=remaining)
                    .filter(|&to| to != start)
                    .map(|to| Move::Relocate {
                        start,
                        len: segment,
                        to,
                    }),
            );
        }
    }
    for first in 0..len {
        moves.extend(
            (first + 1..len).map(|second| Move::Swap { first, second }),
        );
    }
    for first in 0..len {
        moves.extend(
            (first + 2..len).map(|last| Move::Reverse { first, last }),
        );
    }
    moves
}
