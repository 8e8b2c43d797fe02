//! Square pairwise cost matrix between the nodes of a [`CoordinateList`].
//!
//! [`CoordinateList`]: crate::CoordinateList

use thiserror::Error;

/// Errors returned by [`DistanceMatrix::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A row's length differs from the number of rows.
    #[error("distance matrix row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of rows, which every row must match.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
}

/// Non-negative integer costs (metres) between every ordered pair of nodes.
///
/// `cost(i, j)` is the cost of travelling from node `i` to node `j`; the
/// matrix need not be symmetric. Node 0 is the depot.
///
/// # Examples
///
/// ```
/// use tourgate_core::DistanceMatrix;
///
/// # fn main() -> Result<(), tourgate_core::MatrixError> {
/// let matrix = DistanceMatrix::new(vec![
///     vec![0, 10, 20],
///     vec![12, 0, 5],
///     vec![25, 6, 0],
/// ])?;
/// assert_eq!(matrix.size(), 3);
/// assert_eq!(matrix.tour_cost(&[0, 1]), 10 + 5 + 25);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistanceMatrix {
    size: usize,
    costs: Vec<u64>,
}

impl DistanceMatrix {
    /// Build a matrix from rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] when any row's length differs from
    /// the number of rows.
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut costs = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: row_idx,
                    expected: size,
                    found: row.len(),
                });
            }
            costs.extend(row);
        }
        Ok(Self { size, costs })
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of visit locations, i.e. nodes other than the depot.
    #[must_use]
    pub const fn location_count(&self) -> usize {
        self.size.saturating_sub(1)
    }

    /// Cost of the arc from node `from` to node `to`.
    ///
    /// Indices outside the matrix cost zero; callers only pass node indices
    /// below [`size`](Self::size).
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        let cell = (from < self.size && to < self.size)
            .then(|| self.costs.get(from * self.size + to).copied())
            .flatten();
        debug_assert!(cell.is_some(), "matrix lookup out of range: {from} -> {to}");
        cell.unwrap_or(0)
    }

    /// Total cost of visiting the locations in `order` starting and ending at
    /// the depot.
    ///
    /// `order` holds location indices, so location `k` is node `k + 1`. The
    /// sum saturates rather than overflowing. An empty order costs zero.
    #[must_use]
    pub fn tour_cost(&self, order: &[usize]) -> u64 {
        if order.is_empty() {
            return 0;
        }
        let nodes = std::iter::once(0)
            .chain(order.iter().map(|location| location + 1))
            .chain(std::iter::once(0));
        let mut total = 0_u64;
        let mut previous = None;
        for node in nodes {
            if let Some(from) = previous {
                total = total.saturating_add(self.cost(from, node));
            }
            previous = Some(node);
        }
        total
    }

    /// Iterate over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.costs.chunks(self.size.max(1))
    }
}

impl TryFrom<Vec<Vec<u64>>> for DistanceMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}
