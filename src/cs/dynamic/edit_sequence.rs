//! Minimum-cost edit scripts with bounded memory.
//!
//! An edit script is the ordered list of [`EditOperation`]s that turns a
//! `source` sequence into a `target` sequence at minimum total cost, where
//! insertions, removals and substitutions each carry a configurable price
//! ([`EditCosts`]).
//!
//! Every engine runs the same Wagner–Fischer recurrence and breaks ties the
//! same way (Add, then Remove, then Edit), so all of them return the same
//! script operation for operation:
//!
//! - [`SequentialEngine`]: one row-major forward pass, then a backward walk.
//! - [`WavefrontEngine`]: the forward pass split into column chunks filled
//!   concurrently by a wavefront of workers.
//! - [`BoundedWindowEngine`]: keeps at most `window_rows` rows of the
//!   operation matrix and re-runs the forward pass whenever the backward walk
//!   reaches a row that was already evicted.
//!
//! Only two (sequential) or four (wavefront) rows of costs are ever resident.
//!
//! # Examples
//!
//! ```
//! use edit_script::{apply_operations, DiffEngine, EditCosts, WavefrontConfig, WavefrontEngine};
//!
//! let source: Vec<char> = "Hello World!".chars().collect();
//! let target: Vec<char> = "HeLLo Wolrd!".chars().collect();
//!
//! let engine = WavefrontEngine::new(WavefrontConfig::default().with_workers(2)).unwrap();
//! let ops = engine
//!     .compute(Some(&source), Some(&target), EditCosts::default())
//!     .unwrap();
//! assert_eq!(apply_operations(&source, &ops), target);
//! ```

use std::fmt;

use crate::cs::error::{Error, Result};

mod backtrace;
mod batch;
pub(crate) mod cell;
mod cost_rows;
pub mod registry;
mod sequential;
mod trace_window;
mod wavefront;

pub use batch::{BoundedWindowEngine, ForwardPass};
pub use registry::Engine;
pub use sequential::SequentialEngine;
pub use wavefront::{WavefrontConfig, WavefrontEngine};

/// Symbols the engines can compare.
///
/// Any `Copy + Eq` type shared across worker threads qualifies: `char` for
/// text, `u8` for raw bytes, `u16` for UTF-16 code units.
pub trait Symbol: Copy + Eq + Send + Sync {}

impl<T: Copy + Eq + Send + Sync> Symbol for T {}

/// Which transition produced a cell of the edit matrix.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperationKind {
    /// Symbols are equal; nothing to do. Also marks the matrix origin.
    None = 0,
    /// Insert a target symbol that is not in the source.
    Add = 1,
    /// Delete a source symbol that is not in the target.
    Remove = 2,
    /// Substitute a source symbol with a target symbol.
    Edit = 3,
}

impl EditOperationKind {
    #[inline]
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => EditOperationKind::Add,
            2 => EditOperationKind::Remove,
            3 => EditOperationKind::Edit,
            _ => EditOperationKind::None,
        }
    }
}

/// One step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditOperation<T> {
    /// Source symbol consumed by this step, if any.
    pub from: Option<T>,
    /// Target symbol produced by this step, if any.
    pub to: Option<T>,
    /// Kind of the step, normalized to `None` when `from == to`.
    pub kind: EditOperationKind,
}

impl<T: PartialEq> EditOperation<T> {
    /// Creates an operation, normalizing the kind to
    /// [`EditOperationKind::None`] when both sides are equal.
    ///
    /// The recurrence may reach a cell through a zero-cost diagonal; such a
    /// step is reported as `None`, never as an `Edit`.
    pub fn new(from: Option<T>, to: Option<T>, kind: EditOperationKind) -> Self {
        let kind = if from == to {
            EditOperationKind::None
        } else {
            kind
        };
        Self { from, to, kind }
    }
}

impl<T: fmt::Display> fmt::Display for EditOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |value: &Option<T>| match value {
            Some(v) => v.to_string(),
            None => String::new(),
        };
        match self.kind {
            EditOperationKind::None => write!(f, "'{}' Equal", side(&self.to)),
            EditOperationKind::Add => write!(f, "'{}' Add", side(&self.to)),
            EditOperationKind::Remove => write!(f, "'{}' Remove", side(&self.from)),
            EditOperationKind::Edit => {
                write!(f, "'{}' to '{}' Edit", side(&self.from), side(&self.to))
            }
        }
    }
}

/// Prices of the three edit transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditCosts {
    /// Cost of inserting one target symbol.
    pub insert: u32,
    /// Cost of removing one source symbol.
    pub remove: u32,
    /// Cost of substituting one symbol for a different one.
    pub edit: u32,
}

impl EditCosts {
    pub fn new(insert: u32, remove: u32, edit: u32) -> Self {
        Self {
            insert,
            remove,
            edit,
        }
    }
}

impl Default for EditCosts {
    /// Unit costs, i.e. the Levenshtein distance.
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// The single operation every edit-script engine exposes.
pub trait DiffEngine {
    /// Computes the minimum-cost edit script turning `source` into `target`.
    ///
    /// Operations are ordered from the start of both sequences to their end.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `source` or `target` is `None`;
    ///   empty slices are valid.
    /// - [`Error::InternalConsistency`] if a parallel forward pass cannot
    ///   make progress within its liveness bound.
    fn compute<T: Symbol>(
        &self,
        source: Option<&[T]>,
        target: Option<&[T]>,
        costs: EditCosts,
    ) -> Result<Vec<EditOperation<T>>>;

    /// [`compute`](DiffEngine::compute) over the `char`s of two strings.
    fn compute_str(
        &self,
        source: Option<&str>,
        target: Option<&str>,
        costs: EditCosts,
    ) -> Result<Vec<EditOperation<char>>> {
        let source: Option<Vec<char>> = source.map(|s| s.chars().collect());
        let target: Option<Vec<char>> = target.map(|t| t.chars().collect());
        self.compute(source.as_deref(), target.as_deref(), costs)
    }
}

/// Borrowed inputs of one `compute` call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Grid<'a, T> {
    pub(crate) source: &'a [T],
    pub(crate) target: &'a [T],
    pub(crate) costs: EditCosts,
}

impl<'a, T: Symbol> Grid<'a, T> {
    /// Rejects absent inputs before any matrix work starts.
    pub(crate) fn new(
        source: Option<&'a [T]>,
        target: Option<&'a [T]>,
        costs: EditCosts,
    ) -> Result<Self> {
        let source = source.ok_or(Error::InvalidArgument("source"))?;
        let target = target.ok_or(Error::InvalidArgument("target"))?;
        Ok(Self {
            source,
            target,
            costs,
        })
    }

    /// Number of source symbols, `m`.
    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.source.len()
    }

    /// Number of target symbols, `n`.
    #[inline]
    pub(crate) fn cols(&self) -> usize {
        self.target.len()
    }
}

/// Replays `ops` against `source`, producing the sequence they describe.
///
/// `Add` inserts its target symbol, `Remove` drops a source symbol, `Edit`
/// replaces one and `None` keeps it. Replaying the output of any engine
/// yields the `target` it was computed for.
pub fn apply_operations<T: Copy>(source: &[T], ops: &[EditOperation<T>]) -> Vec<T> {
    let mut out = Vec::with_capacity(source.len() + ops.len());
    let mut rest = source.iter();
    for op in ops {
        match op.kind {
            EditOperationKind::Add => out.extend(op.to),
            EditOperationKind::Remove => {
                rest.next();
            }
            EditOperationKind::Edit | EditOperationKind::None => {
                let kept = rest.next().copied();
                out.extend(op.to.or(kept));
            }
        }
    }
    out.extend(rest.copied());
    out
}

/// Total price of `ops` under `costs`. Normalized `None` steps are free.
pub fn script_cost<T>(ops: &[EditOperation<T>], costs: EditCosts) -> u64 {
    ops.iter()
        .map(|op| match op.kind {
            EditOperationKind::None => 0,
            EditOperationKind::Add => u64::from(costs.insert),
            EditOperationKind::Remove => u64::from(costs.remove),
            EditOperationKind::Edit => u64::from(costs.edit),
        })
        .sum()
}
