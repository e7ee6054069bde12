//! Forward/backward cycle under a bounded operation window.

use log::debug;

use super::backtrace::{Backtrace, Walk};
use super::cost_rows::CostRows;
use super::trace_window::TraceWindow;
use super::{
    DiffEngine, EditCosts, EditOperation, Grid, SequentialEngine, Symbol, WavefrontEngine,
};
use crate::cs::error::{Error, Result};

/// A forward pass over the edit matrix.
///
/// `fill` computes rows `0..=rows` over columns `0..=cols`, leaving the last
/// [`TraceWindow::rows`] operation rows resident in `trace`. Columns past
/// `cols` are never needed by a backward walk that starts at `cols`.
pub(crate) trait ForwardFill {
    /// Physical cost rows the pass needs resident (a power of two).
    fn cost_rows(&self) -> usize;

    fn fill<T: Symbol>(
        &self,
        grid: &Grid<'_, T>,
        costs: &CostRows,
        trace: &TraceWindow,
        rows: usize,
        cols: usize,
    ) -> Result<()>;
}

/// Operation window holding every row of `grid`, so one pass suffices.
pub(crate) fn full_window<T: Symbol>(grid: &Grid<'_, T>) -> TraceWindow {
    TraceWindow::full(grid.rows() + 1, grid.cols() + 1)
}

/// Alternates forward passes and backward walks until the walk reaches the
/// origin. Returns the script and the number of forward passes it took.
///
/// `trace` must be `grid.cols() + 1` cells wide.
pub(crate) fn run<F: ForwardFill, T: Symbol>(
    forward: &F,
    grid: &Grid<'_, T>,
    trace: TraceWindow,
) -> Result<(Vec<EditOperation<T>>, usize)> {
    let costs = CostRows::new(forward.cost_rows(), grid.cols() + 1)?;

    let mut walk = Backtrace::new(grid);
    let mut passes = 0;
    loop {
        let (x, y) = walk.position();
        forward.fill(grid, &costs, &trace, y, x)?;
        passes += 1;

        match walk.walk(&trace, trace.resident_from(y))? {
            Walk::Origin => break,
            Walk::Evicted => {
                let (x, y) = walk.position();
                debug!("operation window exhausted, re-running forward pass up to ({x}, {y})");
            }
        }
    }

    debug!(
        "edit script for {}x{} matrix took {passes} forward pass(es)",
        grid.rows(),
        grid.cols()
    );
    Ok((walk.finish(), passes))
}

/// The forward pass a [`BoundedWindowEngine`] re-runs.
#[derive(Debug, Clone, Default)]
pub enum ForwardPass {
    /// Single-threaded, two cost rows.
    #[default]
    Sequential,
    /// Column chunks filled by a wavefront of workers.
    Wavefront(WavefrontEngine),
}

impl ForwardFill for ForwardPass {
    fn cost_rows(&self) -> usize {
        match self {
            ForwardPass::Sequential => SequentialEngine.cost_rows(),
            ForwardPass::Wavefront(engine) => engine.cost_rows(),
        }
    }

    fn fill<T: Symbol>(
        &self,
        grid: &Grid<'_, T>,
        costs: &CostRows,
        trace: &TraceWindow,
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        match self {
            ForwardPass::Sequential => SequentialEngine.fill(grid, costs, trace, rows, cols),
            ForwardPass::Wavefront(engine) => engine.fill(grid, costs, trace, rows, cols),
        }
    }
}

/// Edit-script engine whose memory does not grow with the source length.
///
/// Keeps only `window_rows` rows of the operation matrix. The backward walk
/// consumes operations from the bottom of the matrix; once it needs a row
/// that was already evicted, the forward pass is re-run over rows `0..=y` of
/// the current position and the walk resumes. Smaller windows use less
/// memory and recompute more: the worst case is `O(m² · n / window_rows)`
/// cell updates.
///
/// # Examples
///
/// ```
/// use edit_script::{BoundedWindowEngine, DiffEngine, EditCosts, SequentialEngine};
///
/// let source: Vec<char> = "abcdefghij".repeat(8).chars().collect();
/// let target: Vec<char> = "abcXefghij".repeat(8).chars().collect();
///
/// let bounded = BoundedWindowEngine::new(16).unwrap();
/// let ops = bounded
///     .compute(Some(&source), Some(&target), EditCosts::default())
///     .unwrap();
/// let reference = SequentialEngine::new()
///     .compute(Some(&source), Some(&target), EditCosts::default())
///     .unwrap();
/// assert_eq!(ops, reference);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedWindowEngine {
    window_rows: usize,
    forward: ForwardPass,
}

impl BoundedWindowEngine {
    /// Creates an engine keeping `window_rows` operation rows, filled by the
    /// sequential forward pass.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] unless `window_rows` is a power of two.
    pub fn new(window_rows: usize) -> Result<Self> {
        if !window_rows.is_power_of_two() {
            return Err(Error::invalid_configuration(format!(
                "window_rows must be a power of two, got {window_rows}"
            )));
        }
        Ok(Self {
            window_rows,
            forward: ForwardPass::Sequential,
        })
    }

    /// Replaces the forward pass re-run on every batch.
    pub fn with_forward_pass(mut self, forward: ForwardPass) -> Self {
        self.forward = forward;
        self
    }

    pub fn window_rows(&self) -> usize {
        self.window_rows
    }

    pub fn forward_pass(&self) -> &ForwardPass {
        &self.forward
    }
}

impl DiffEngine for BoundedWindowEngine {
    fn compute<T: Symbol>(
        &self,
        source: Option<&[T]>,
        target: Option<&[T]>,
        costs: EditCosts,
    ) -> Result<Vec<EditOperation<T>>> {
        let grid = Grid::new(source, target, costs)?;
        let trace = TraceWindow::new(self.window_rows, grid.cols() + 1)?;
        let (ops, _passes) = run(&self.forward, &grid, trace)?;
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::dynamic::edit_sequence::{apply_operations, WavefrontConfig};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_rejects_bad_window() {
        assert!(matches!(
            BoundedWindowEngine::new(0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BoundedWindowEngine::new(24),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(BoundedWindowEngine::new(1).unwrap().window_rows(), 1);
    }

    #[test]
    fn test_full_window_needs_one_pass() {
        let source = chars("Hello World!");
        let target = chars("HeLLo Wolrd!");
        let grid = Grid::new(Some(&source[..]), Some(&target[..]), EditCosts::default()).unwrap();
        let (_, passes) = run(&SequentialEngine, &grid, full_window(&grid)).unwrap();
        assert_eq!(passes, 1);
    }

    #[test]
    fn test_full_window_has_one_row_per_source_symbol() {
        let source = vec![0u8; 1024];
        let target = vec![1u8; 1024];
        let grid = Grid::new(Some(&source[..]), Some(&target[..]), EditCosts::default()).unwrap();
        assert_eq!(full_window(&grid).rows(), 1025);

        let source = chars("Hello World!");
        let grid = Grid::new(Some(&source[..]), Some(&[][..]), EditCosts::default()).unwrap();
        assert_eq!(full_window(&grid).rows(), 13);
    }

    #[test]
    fn test_small_window_restarts() {
        let source = chars(&"abcdefghij".repeat(6));
        let target = chars(&"abcdXfghij".repeat(6));
        let grid = Grid::new(Some(&source[..]), Some(&target[..]), EditCosts::default()).unwrap();

        let (reference, _) = run(&SequentialEngine, &grid, full_window(&grid)).unwrap();
        for window in [1, 2, 4, 8, 16, 32] {
            let trace = TraceWindow::new(window, grid.cols() + 1).unwrap();
            let (ops, passes) = run(&SequentialEngine, &grid, trace).unwrap();
            assert_eq!(ops, reference, "window {window}");
            assert!(passes > 1, "window {window} should restart");
            assert_eq!(apply_operations(&source, &ops), target);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let engine = BoundedWindowEngine::new(2).unwrap();
        let ops = engine
            .compute_str(Some(""), Some("abcde"), EditCosts::default())
            .unwrap();
        assert_eq!(ops.len(), 5);

        let ops = engine
            .compute_str(Some("abcde"), Some(""), EditCosts::default())
            .unwrap();
        assert_eq!(ops.len(), 5);

        let ops = engine
            .compute_str(Some(""), Some(""), EditCosts::default())
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_absent_inputs() {
        let engine = BoundedWindowEngine::new(4).unwrap();
        assert_eq!(
            engine
                .compute_str(None, None, EditCosts::default())
                .unwrap_err(),
            Error::InvalidArgument("source")
        );
    }

    #[test]
    fn test_wavefront_forward_pass() {
        let source = chars(&"Nulla nec ipsum sit amet ".repeat(4));
        let target = chars(&"Nulla nec ipsum - Hello - sit amet ".repeat(4));
        let wavefront = WavefrontEngine::new(
            WavefrontConfig::default()
                .with_workers(3)
                .with_min_chunk_width(4),
        )
        .unwrap();
        let engine = BoundedWindowEngine::new(8)
            .unwrap()
            .with_forward_pass(ForwardPass::Wavefront(wavefront));

        let ops = engine
            .compute(Some(&source), Some(&target), EditCosts::default())
            .unwrap();
        let reference = SequentialEngine::new()
            .compute(Some(&source), Some(&target), EditCosts::default())
            .unwrap();
        assert_eq!(ops, reference);
    }
}
