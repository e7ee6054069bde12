//! Backward walk from `(m, n)` to the origin.

use super::trace_window::TraceWindow;
use super::{EditOperation, EditOperationKind, Grid, Symbol};
use crate::cs::error::{Error, Result};

/// Where a walk over the resident rows stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    /// The origin was reached; the script is complete.
    Origin,
    /// The next row needed has been evicted from the window.
    Evicted,
}

/// Resumable walk through the operation matrix.
///
/// Operations are collected from the end of the script towards its start
/// and reversed by [`Backtrace::finish`].
pub(crate) struct Backtrace<'g, 'a, T> {
    grid: &'g Grid<'a, T>,
    x: usize,
    y: usize,
    ops: Vec<EditOperation<T>>,
}

impl<'g, 'a, T: Symbol> Backtrace<'g, 'a, T> {
    pub(crate) fn new(grid: &'g Grid<'a, T>) -> Self {
        Self {
            grid,
            x: grid.cols(),
            y: grid.rows(),
            ops: Vec::with_capacity(grid.rows() + grid.cols()),
        }
    }

    /// Current `(x, y)`: target column, source row.
    #[inline]
    pub(crate) fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Follows `trace` while the current row is at least `lowest`.
    pub(crate) fn walk(&mut self, trace: &TraceWindow, lowest: usize) -> Result<Walk> {
        while self.y >= lowest {
            let op = match trace.get(self.y, self.x) {
                EditOperationKind::None => return Ok(Walk::Origin),
                EditOperationKind::Add => {
                    self.x = step_back(self.x, self.y, self.x)?;
                    EditOperation::new(None, Some(self.grid.target[self.x]), EditOperationKind::Add)
                }
                EditOperationKind::Remove => {
                    self.y = step_back(self.x, self.y, self.y)?;
                    EditOperation::new(
                        Some(self.grid.source[self.y]),
                        None,
                        EditOperationKind::Remove,
                    )
                }
                EditOperationKind::Edit => {
                    self.x = step_back(self.x, self.y, self.x)?;
                    self.y = step_back(self.x, self.y, self.y)?;
                    EditOperation::new(
                        Some(self.grid.source[self.y]),
                        Some(self.grid.target[self.x]),
                        EditOperationKind::Edit,
                    )
                }
            };
            self.ops.push(op);
        }
        Ok(Walk::Evicted)
    }

    /// The collected script in execution order.
    pub(crate) fn finish(mut self) -> Vec<EditOperation<T>> {
        self.ops.reverse();
        self.ops
    }
}

#[inline]
fn step_back(x: usize, y: usize, coord: usize) -> Result<usize> {
    coord.checked_sub(1).ok_or_else(|| {
        Error::internal_consistency(format!("trace leads outside the matrix at ({x}, {y})"))
    })
}
