//! Reference forward-backward engine.

use std::ops::Range;

use super::batch::{self, ForwardFill};
use super::cell::{left_edge, relax, top_edge};
use super::cost_rows::CostRows;
use super::trace_window::TraceWindow;
use super::{DiffEngine, EditCosts, EditOperation, EditOperationKind, Grid, Symbol};
use crate::cs::error::Result;

/// Single-threaded edit-script engine.
///
/// Fills the matrix row by row keeping two cost rows, with an operation
/// window tall enough for the whole matrix, then walks back from `(m, n)`.
/// Every other engine is required to return exactly what this one returns.
///
/// # Examples
///
/// ```
/// use edit_script::{DiffEngine, EditCosts, EditOperationKind, SequentialEngine};
///
/// let ops = SequentialEngine::new()
///     .compute_str(Some("Hello World!"), Some(""), EditCosts::default())
///     .unwrap();
/// assert_eq!(ops.len(), 12);
/// assert!(ops.iter().all(|op| op.kind == EditOperationKind::Remove));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        SequentialEngine
    }
}

impl DiffEngine for SequentialEngine {
    fn compute<T: Symbol>(
        &self,
        source: Option<&[T]>,
        target: Option<&[T]>,
        costs: EditCosts,
    ) -> Result<Vec<EditOperation<T>>> {
        let grid = Grid::new(source, target, costs)?;
        let (ops, _passes) = batch::run(self, &grid, batch::full_window(&grid))?;
        Ok(ops)
    }
}

impl ForwardFill for SequentialEngine {
    fn cost_rows(&self) -> usize {
        2
    }

    fn fill<T: Symbol>(
        &self,
        grid: &Grid<'_, T>,
        costs: &CostRows,
        trace: &TraceWindow,
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        init_top_row(grid, costs, trace, cols);
        for row in 1..=rows {
            start_row(grid, costs, trace, row);
            fill_span(grid, costs, trace, row, 1..cols + 1);
        }
        Ok(())
    }
}

/// Writes row 0 for columns `0..=cols`: the origin, then `cols` insertions.
pub(super) fn init_top_row<T>(
    grid: &Grid<'_, T>,
    costs: &CostRows,
    trace: &TraceWindow,
    cols: usize,
) {
    costs.set(0, 0, 0);
    trace.set(0, 0, EditOperationKind::None);
    for col in 1..=cols {
        costs.set(0, col, top_edge(col, &grid.costs));
        trace.set(0, col, EditOperationKind::Add);
    }
}

/// Writes column 0 of `row`. Physical rows are recycled, so this runs on
/// every row of every pass.
#[inline]
pub(super) fn start_row<T>(
    grid: &Grid<'_, T>,
    costs: &CostRows,
    trace: &TraceWindow,
    row: usize,
) {
    costs.set(row, 0, left_edge(row, &grid.costs));
    trace.set(row, 0, EditOperationKind::Remove);
}

/// Fills the cells of `row` whose columns fall in `span`, left to right.
///
/// Reads `row - 1` over `span.start - 1..span.end` and `row` at
/// `span.start - 1`; the caller guarantees those cells are current.
#[inline]
pub(super) fn fill_span<T: Symbol>(
    grid: &Grid<'_, T>,
    costs: &CostRows,
    trace: &TraceWindow,
    row: usize,
    span: Range<usize>,
) {
    let symbol = grid.source[row - 1];
    let mut left = costs.get(row, span.start - 1);
    for col in span {
        let (cost, kind) = relax(
            left,
            costs.get(row - 1, col),
            costs.get(row - 1, col - 1),
            symbol == grid.target[col - 1],
            &grid.costs,
        );
        costs.set(row, col, cost);
        trace.set(row, col, kind);
        left = cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::dynamic::edit_distance::weighted_edit_distance;
    use crate::cs::dynamic::edit_sequence::{apply_operations, script_cost};
    use crate::cs::error::Error;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn kinds(ops: &[EditOperation<char>]) -> Vec<EditOperationKind> {
        ops.iter().map(|op| op.kind).collect()
    }

    #[test]
    fn test_absent_inputs() {
        let engine = SequentialEngine::new();
        assert_eq!(
            engine
                .compute_str(None, Some("abc"), EditCosts::default())
                .unwrap_err(),
            Error::InvalidArgument("source")
        );
        assert_eq!(
            engine
                .compute_str(Some("abc"), None, EditCosts::default())
                .unwrap_err(),
            Error::InvalidArgument("target")
        );
    }

    #[test]
    fn test_both_empty() {
        let ops = SequentialEngine::new()
            .compute_str(Some(""), Some(""), EditCosts::default())
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_pure_insertion() {
        let ops = SequentialEngine::new()
            .compute_str(Some(""), Some("abc"), EditCosts::default())
            .unwrap();
        assert_eq!(ops.len(), 3);
        for (op, c) in ops.iter().zip("abc".chars()) {
            assert_eq!(*op, EditOperation::new(None, Some(c), EditOperationKind::Add));
        }
    }

    #[test]
    fn test_pure_deletion() {
        let ops = SequentialEngine::new()
            .compute_str(Some("Hello World!"), Some(""), EditCosts::default())
            .unwrap();
        assert_eq!(ops.len(), 12);
        for (op, c) in ops.iter().zip("Hello World!".chars()) {
            assert_eq!(*op, EditOperation::new(Some(c), None, EditOperationKind::Remove));
        }
    }

    #[test]
    fn test_identity_is_all_equal() {
        let s = chars("abcdefghij");
        let ops = SequentialEngine::new()
            .compute(Some(&s), Some(&s), EditCosts::default())
            .unwrap();
        assert_eq!(ops.len(), s.len());
        assert!(ops.iter().all(|op| op.kind == EditOperationKind::None));
        assert_eq!(script_cost(&ops, EditCosts::default()), 0);
    }

    #[test]
    fn test_hello_world() {
        let source = chars("Hello World!");
        let target = chars("HeLLo Wolrd!");
        let ops = SequentialEngine::new()
            .compute(Some(&source), Some(&target), EditCosts::default())
            .unwrap();

        use EditOperationKind as K;
        // 'l' -> 'L' twice, then the 'r' moves past the 'l'.
        assert_eq!(
            kinds(&ops),
            vec![
                K::None,
                K::None,
                K::Edit,
                K::Edit,
                K::None,
                K::None,
                K::None,
                K::None,
                K::Remove,
                K::None,
                K::Add,
                K::None,
                K::None,
            ]
        );
        assert_eq!(apply_operations(&source, &ops), target);
        assert_eq!(script_cost(&ops, EditCosts::default()), 4);
    }

    #[test]
    fn test_insertion_in_the_middle() {
        let source = chars("Nulla nec ipsum sit amet enim malesuada dapibus vel quis mi.");
        let target =
            chars("Nulla nec ipsum sit amet - Hello - enim malesuada dapibus vel quis mi.");
        let ops = SequentialEngine::new()
            .compute(Some(&source), Some(&target), EditCosts::default())
            .unwrap();
        let adds = ops.iter().filter(|op| op.kind == EditOperationKind::Add).count();
        assert_eq!(adds, target.len() - source.len());
        assert_eq!(script_cost(&ops, EditCosts::default()), adds as u64);
        assert_eq!(apply_operations(&source, &ops), target);
    }

    #[test]
    fn test_weighted_costs_avoid_expensive_edits() {
        let costs = EditCosts::new(1, 1, 5);
        let source = chars("abc");
        let target = chars("abd");
        let ops = SequentialEngine::new()
            .compute(Some(&source), Some(&target), costs)
            .unwrap();
        assert!(ops.iter().all(|op| op.kind != EditOperationKind::Edit));
        assert_eq!(script_cost(&ops, costs), 2);
        assert_eq!(
            script_cost(&ops, costs),
            u64::from(weighted_edit_distance(&source, &target, costs))
        );
    }

    #[test]
    fn test_byte_symbols() {
        let ops = SequentialEngine::new()
            .compute(Some(&b"kitten"[..]), Some(&b"sitting"[..]), EditCosts::default())
            .unwrap();
        assert_eq!(apply_operations(b"kitten", &ops), b"sitting".to_vec());
        assert_eq!(script_cost(&ops, EditCosts::default()), 3);
    }
}
