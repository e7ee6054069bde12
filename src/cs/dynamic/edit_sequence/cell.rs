//! Arithmetic of a single cell of the edit matrix.

use super::{EditCosts, EditOperationKind};

/// Picks the cheapest way to reach `D[i][j]`.
///
/// - `left` is `D[i][j-1]` (reached by an Add),
/// - `up` is `D[i-1][j]` (reached by a Remove),
/// - `diag` is `D[i-1][j-1]` (reached by an Edit, free when `same`).
///
/// Ties go to Add, then Remove, then Edit. Sums saturate at `u32::MAX`.
#[inline]
pub(crate) fn relax(
    left: u32,
    up: u32,
    diag: u32,
    same: bool,
    costs: &EditCosts,
) -> (u32, EditOperationKind) {
    let insert = left.saturating_add(costs.insert);
    let remove = up.saturating_add(costs.remove);
    let edit = diag.saturating_add(if same { 0 } else { costs.edit });

    let min = insert.min(remove).min(edit);
    let kind = if min == insert {
        EditOperationKind::Add
    } else if min == remove {
        EditOperationKind::Remove
    } else {
        EditOperationKind::Edit
    };
    (min, kind)
}

/// `D[0][col]`: `col` insertions.
#[inline]
pub(crate) fn top_edge(col: usize, costs: &EditCosts) -> u32 {
    costs.insert.saturating_mul(saturating_u32(col))
}

/// `D[row][0]`: `row` removals.
#[inline]
pub(crate) fn left_edge(row: usize, costs: &EditCosts) -> u32 {
    costs.remove.saturating_mul(saturating_u32(row))
}

#[inline]
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
