//! Minimum-cost edit scripts between symbol sequences.
//!
//! The engines in [`cs::dynamic::edit_sequence`] compute the cheapest
//! sequence of insertions, removals and substitutions that turns one
//! sequence into another, keeping only a sliding window of the DP matrix
//! resident and optionally filling it with a wavefront of worker threads.
//!
//! ```
//! use edit_script::{DiffEngine, EditCosts, EditOperationKind, SequentialEngine};
//!
//! let ops = SequentialEngine::new()
//!     .compute_str(Some("kitten"), Some("sitting"), EditCosts::default())
//!     .unwrap();
//! let changes = ops.iter().filter(|op| op.kind != EditOperationKind::None).count();
//! assert_eq!(changes, 3);
//! ```

pub mod cs;

pub use cs::dynamic;
pub use cs::dynamic::edit_sequence::{
    apply_operations, script_cost, BoundedWindowEngine, DiffEngine, EditCosts, EditOperation,
    EditOperationKind, Engine, ForwardPass, SequentialEngine, Symbol, WavefrontConfig,
    WavefrontEngine,
};
pub use cs::error::{Error, Result};
