//! Rolling store of the most recent cost rows.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::cs::error::{Error, Result};

/// The last `rows` rows of the cost matrix `D`, `width` cells each.
///
/// Logical row `r` lives in physical row `r & (rows - 1)`, so `rows` must be
/// a power of two. Cells are atomics accessed with `Relaxed` ordering: the
/// store can be shared by wavefront workers, each writing only the columns
/// it owns, while the progress counters of the wavefront provide the
/// happens-before edges between a write and a neighbor's read.
#[derive(Debug)]
pub(crate) struct CostRows {
    cells: Vec<AtomicU32>,
    width: usize,
    mask: usize,
}

impl CostRows {
    pub(crate) fn new(rows: usize, width: usize) -> Result<Self> {
        if !rows.is_power_of_two() {
            return Err(Error::invalid_configuration(format!(
                "cost rows must be a power of two, got {rows}"
            )));
        }
        let cells = (0..rows * width).map(|_| AtomicU32::new(0)).collect();
        Ok(Self {
            cells,
            width,
            mask: rows - 1,
        })
    }

    /// Number of physical rows.
    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.mask + 1
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(col < self.width, "column {col} out of {}", self.width);
        (row & self.mask) * self.width + col
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[self.offset(row, col)].load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set(&self, row: usize, col: usize, cost: u32) {
        self.cells[self.offset(row, col)].store(cost, Ordering::Relaxed);
    }
}
