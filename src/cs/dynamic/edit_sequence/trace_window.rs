//! Bounded window of operation rows.

use std::sync::atomic::{AtomicU8, Ordering};

use super::EditOperationKind;
use crate::cs::error::{Error, Result};

/// The last `rows` rows of the operation matrix `M`, `width` cells each.
///
/// A bounded window is addressed like
/// [`CostRows`](super::cost_rows::CostRows): logical row `r` is stored in
/// physical row `r & (rows - 1)`. Older rows are overwritten as the forward
/// pass advances, and the batch controller re-derives them on demand. A full
/// window holds every row of the matrix and is never wrapped.
#[derive(Debug)]
pub(crate) struct TraceWindow {
    cells: Vec<AtomicU8>,
    width: usize,
    rows: usize,
    mask: usize,
}

impl TraceWindow {
    /// A window of `rows` physical rows, recycled once the pass gets past them.
    pub(crate) fn new(rows: usize, width: usize) -> Result<Self> {
        if !rows.is_power_of_two() {
            return Err(Error::invalid_configuration(format!(
                "window_rows must be a power of two, got {rows}"
            )));
        }
        Ok(Self::alloc(rows, width, rows - 1))
    }

    /// A window holding logical rows `0..rows` exactly.
    pub(crate) fn full(rows: usize, width: usize) -> Self {
        Self::alloc(rows, width, usize::MAX)
    }

    fn alloc(rows: usize, width: usize, mask: usize) -> Self {
        let cells = (0..rows * width)
            .map(|_| AtomicU8::new(EditOperationKind::None as u8))
            .collect();
        Self {
            cells,
            width,
            rows,
            mask,
        }
    }

    /// Number of physical rows.
    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Lowest logical row still resident after a pass that ended at `top`.
    #[inline]
    pub(crate) fn resident_from(&self, top: usize) -> usize {
        (top + 1).saturating_sub(self.rows())
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(col < self.width, "column {col} out of {}", self.width);
        debug_assert!(row & self.mask < self.rows, "row {row} out of {}", self.rows);
        (row & self.mask) * self.width + col
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> EditOperationKind {
        EditOperationKind::from_u8(self.cells[self.offset(row, col)].load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn set(&self, row: usize, col: usize, kind: EditOperationKind) {
        self.cells[self.offset(row, col)].store(kind as u8, Ordering::Relaxed);
    }
}
