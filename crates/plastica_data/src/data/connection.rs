use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A weighted, directed bipartite connection table between `rows` source
/// genes and `cols` targets.
///
/// Entries live in one ordered map per row. A position with no stored entry
/// has weight zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SparseConnection {
    /// Number of rows (always the gene count for genome layers).
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Stored weights, indexed by row then column.
    pub entries: Vec<BTreeMap<usize, f64>>,
}

impl SparseConnection {
    /// Creates an empty `rows × cols` connection.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: vec![BTreeMap::new(); rows],
        }
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries
            .get(row)
            .and_then(|r| r.get(&col))
            .copied()
            .unwrap_or(0.0)
    }

    /// Stores `weight` at `(row, col)`, replacing any previous entry.
    pub fn set(&mut self, row: usize, col: usize, weight: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.entries[row].insert(col, weight);
    }

    /// Removes the entry at `(row, col)`, returning it if one was stored.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<f64> {
        self.entries.get_mut(row).and_then(|r| r.remove(&col))
    }

    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.entries
            .get(row)
            .is_some_and(|r| r.contains_key(&col))
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.iter().map(BTreeMap::len).sum()
    }

    pub fn clear(&mut self) {
        for row in &mut self.entries {
            row.clear();
        }
    }

    /// Iterates over stored entries as `(row, col, weight)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().map(move |(&j, &w)| (i, j, w)))
    }

    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entries_read_as_zero() {
        let mut c = SparseConnection::new(3, 4);
        assert_eq!(c.get(1, 2), 0.0);
        c.set(1, 2, -0.75);
        assert_eq!(c.get(1, 2), -0.75);
        assert!(c.contains(1, 2));
        assert_eq!(c.nnz(), 1);

        assert_eq!(c.remove(1, 2), Some(-0.75));
        assert_eq!(c.get(1, 2), 0.0);
        assert_eq!(c.nnz(), 0);
    }

    #[test]
    fn test_iter_is_row_major() {
        let mut c = SparseConnection::new(2, 3);
        c.set(1, 0, 3.0);
        c.set(0, 2, 2.0);
        c.set(0, 1, 1.0);
        let seen: Vec<_> = c.iter().collect();
        assert_eq!(seen, vec![(0, 1, 1.0), (0, 2, 2.0), (1, 0, 3.0)]);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let mut c = SparseConnection::new(1, 12);
        c.set(0, 10, 0.5);
        c.set(0, 2, 0.25);
        let json = serde_json::to_string(&c).unwrap();
        let back: SparseConnection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }
}
