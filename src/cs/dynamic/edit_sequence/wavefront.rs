//! Wavefront-parallel forward pass.
//!
//! The work columns `1..=n` are split into contiguous chunks, one worker per
//! chunk. Cell `(i, j)` depends on `(i, j-1)`, `(i-1, j)` and `(i-1, j-1)`,
//! so inside a chunk the owner simply goes left to right; across chunks the
//! only hazards are at the boundaries:
//!
//! - worker `k` cannot start row `i` before worker `k-1` has finished it,
//!   since its first cell reads `D[i][start_k - 1]`;
//! - worker `k` cannot write row `i` into the physical cost row still
//!   holding a row that worker `k+1` reads, so it may run at most
//!   `COST_ROWS - 1` rows ahead of its right neighbor.
//!
//! Each worker publishes the last row it finished with `Release` ordering and
//! neighbors observe it with `Acquire`, which orders the `Relaxed` cell
//! writes of one worker before the reads of the next. Every cell has exactly
//! one writer: column 0 belongs to worker 0, every other column to the chunk
//! containing it.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::batch::{self, ForwardFill};
use super::cost_rows::CostRows;
use super::sequential::{fill_span, init_top_row, start_row};
use super::trace_window::TraceWindow;
use super::{DiffEngine, EditCosts, EditOperation, Grid, SequentialEngine, Symbol};
use crate::cs::error::{Error, Result};

/// Physical cost rows: the smallest power of two that lets a leading writer
/// and a lagging reader share the store without aliasing.
const COST_ROWS: usize = 4;

/// Busy-wait iterations before a waiting worker starts yielding.
const SPIN_BURST: u32 = 128;

/// Yields between two looks at the clock.
const CLOCK_EVERY: u32 = 64;

/// Configuration for [`WavefrontEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavefrontConfig {
    /// Upper bound on concurrent workers; also the size of the worker pool.
    pub workers: usize,
    /// Narrowest column chunk handed to a worker. Inputs too narrow to give
    /// two workers a chunk each are filled sequentially.
    pub min_chunk_width: usize,
    /// Longest a worker may wait on a neighbor before the pass is abandoned
    /// with [`Error::InternalConsistency`].
    pub liveness_bound: Duration,
}

impl Default for WavefrontConfig {
    fn default() -> Self {
        Self {
            workers: rayon::current_num_threads().max(1),
            min_chunk_width: 10,
            liveness_bound: Duration::from_secs(10),
        }
    }
}

impl WavefrontConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_min_chunk_width(mut self, min_chunk_width: usize) -> Self {
        self.min_chunk_width = min_chunk_width;
        self
    }

    pub fn with_liveness_bound(mut self, liveness_bound: Duration) -> Self {
        self.liveness_bound = liveness_bound;
        self
    }
}

/// Edit-script engine whose forward pass runs as a wavefront of workers.
///
/// Produces exactly the script of [`SequentialEngine`]; with one worker, or
/// on inputs narrower than two chunks, it *is* the sequential pass.
///
/// The engine owns a rayon pool with one thread per configured worker, so
/// every chunk has a thread of its own while its neighbors spin. Passes on
/// clones of one engine share that pool and run one at a time.
///
/// # Examples
///
/// ```
/// use edit_script::{DiffEngine, EditCosts, SequentialEngine, WavefrontConfig, WavefrontEngine};
///
/// let source: Vec<char> = "the quick brown fox jumps over the lazy dog".chars().collect();
/// let target: Vec<char> = "the quick red fox jumped over a lazy dog".chars().collect();
///
/// let config = WavefrontConfig::default().with_workers(4).with_min_chunk_width(4);
/// let engine = WavefrontEngine::new(config).unwrap();
/// let ops = engine
///     .compute(Some(&source), Some(&target), EditCosts::default())
///     .unwrap();
/// let reference = SequentialEngine::new()
///     .compute(Some(&source), Some(&target), EditCosts::default())
///     .unwrap();
/// assert_eq!(ops, reference);
/// ```
#[derive(Debug, Clone)]
pub struct WavefrontEngine {
    config: WavefrontConfig,
    pool: Arc<ThreadPool>,
    pass: Arc<Mutex<()>>,
}

impl WavefrontEngine {
    /// Builds the engine and its worker pool.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `workers` or `min_chunk_width` is zero.
    /// - [`Error::ThreadPool`] if the pool cannot be started.
    pub fn new(config: WavefrontConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(Error::invalid_configuration("workers must be at least 1"));
        }
        if config.min_chunk_width == 0 {
            return Err(Error::invalid_configuration(
                "min_chunk_width must be at least 1",
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("wavefront-{i}"))
            .build()?;
        Ok(Self {
            config,
            pool: Arc::new(pool),
            pass: Arc::new(Mutex::new(())),
        })
    }

    pub fn config(&self) -> &WavefrontConfig {
        &self.config
    }
}

impl DiffEngine for WavefrontEngine {
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

impl ForwardFill for WavefrontEngine {
    fn cost_rows(&self) -> usize {
        COST_ROWS
    }

    fn fill<T: Symbol>(
        &self,
        grid: &Grid<'_, T>,
        costs: &CostRows,
        trace: &TraceWindow,
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        let chunks = partition(cols, self.config.workers, self.config.min_chunk_width);
        if rows == 0 || chunks.len() < 2 {
            return SequentialEngine.fill(grid, costs, trace, rows, cols);
        }
        debug_assert!(costs.rows() >= COST_ROWS);

        let _pass = self
            .pass
            .lock()
            .map_err(|_| Error::internal_consistency("a previous wavefront pass panicked"))?;

        debug!(
            "wavefront pass over {rows} rows x {cols} columns with {} workers",
            chunks.len()
        );
        init_top_row(grid, costs, trace, cols);

        let front = Front::new(chunks.len(), self.config.liveness_bound);
        self.pool.scope(|scope| {
            for (worker, span) in chunks.iter().enumerate() {
                let front = &front;
                scope.spawn(move |_| {
                    if let Err(err) = front.run(worker, span.clone(), grid, costs, trace, rows) {
                        front.abort(err);
                    }
                });
            }
        });

        match front.failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Splits work columns `1..=cols` into at most `workers` chunks of at least
/// `min_width` columns; the remainder goes to the last chunk.
pub(crate) fn partition(cols: usize, workers: usize, min_width: usize) -> Vec<Range<usize>> {
    if cols == 0 {
        return Vec::new();
    }
    let width = (cols / workers.max(1)).max(min_width.max(1));
    let chunks = (cols / width).clamp(1, workers.max(1));
    (0..chunks)
        .map(|k| {
            let start = 1 + k * width;
            let end = if k + 1 == chunks {
                cols + 1
            } else {
                start + width
            };
            start..end
        })
        .collect()
}

/// Progress shared by the workers of one pass.
struct Front {
    /// Last row each worker has finished; 0 until it finishes row 1.
    done: Vec<AtomicUsize>,
    aborted: AtomicBool,
    failure: OnceLock<Error>,
    liveness_bound: Duration,
}

impl Front {
    fn new(workers: usize, liveness_bound: Duration) -> Self {
        Self {
            done: (0..workers).map(|_| AtomicUsize::new(0)).collect(),
            aborted: AtomicBool::new(false),
            failure: OnceLock::new(),
            liveness_bound,
        }
    }

    fn run<T: Symbol>(
        &self,
        worker: usize,
        span: Range<usize>,
        grid: &Grid<'_, T>,
        costs: &CostRows,
        trace: &TraceWindow,
        rows: usize,
    ) -> Result<()> {
        let last = self.done.len() - 1;
        let lead = costs.rows() - 1;
        trace!("worker {worker} owns columns {span:?}");

        for row in 1..=rows {
            if worker > 0 {
                self.wait_for(worker, row, || {
                    self.done[worker - 1].load(Ordering::Acquire) >= row
                })?;
            }
            if worker < last {
                self.wait_for(worker, row, || {
                    self.done[worker + 1].load(Ordering::Acquire) + lead >= row
                })?;
            }

            if worker == 0 {
                start_row(grid, costs, trace, row);
            }
            fill_span(grid, costs, trace, row, span.clone());
            self.done[worker].store(row, Ordering::Release);
        }

        trace!("worker {worker} finished {rows} rows");
        Ok(())
    }

    /// Spins until `ready` holds, a peer aborts, or the liveness bound runs out.
    fn wait_for(&self, worker: usize, row: usize, ready: impl Fn() -> bool) -> Result<()> {
        let started = Instant::now();
        let mut spins: u32 = 0;
        loop {
            if ready() {
                return Ok(());
            }
            if self.aborted.load(Ordering::Acquire) {
                return Err(Error::internal_consistency(format!(
                    "worker {worker} stopped at row {row}: a peer aborted the pass"
                )));
            }

            spins = spins.wrapping_add(1);
            if spins < SPIN_BURST {
                std::hint::spin_loop();
                continue;
            }
            std::thread::yield_now();
            if spins % CLOCK_EVERY == 0 && started.elapsed() > self.liveness_bound {
                if ready() {
                    return Ok(());
                }
                let progress: Vec<usize> = self
                    .done
                    .iter()
                    .map(|d| d.load(Ordering::Acquire))
                    .collect();
                let bound = self.liveness_bound;
                warn!("worker {worker} waited over {bound:?} at row {row}; progress {progress:?}");
                return Err(Error::internal_consistency(format!(
                    "worker {worker} stuck at row {row} for {bound:?} (progress {progress:?})"
                )));
            }
        }
    }

    /// Records the first failure and releases every waiting worker.
    fn abort(&self, err: Error) {
        let _ = self.failure.set(err);
        self.aborted.store(true, Ordering::Release);
    }
}
