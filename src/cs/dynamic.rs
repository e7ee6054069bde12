pub mod edit_distance;
pub mod edit_sequence;

// Re-export dynamic programming algorithms with descriptive names
pub use edit_distance::{levenshtein_distance, weighted_edit_distance};
pub use edit_sequence::{BoundedWindowEngine, DiffEngine, SequentialEngine, WavefrontEngine};
