//! Distance-only edit distance, without operation reconstruction.

use crate::cs::dynamic::edit_sequence::cell::{left_edge, top_edge};
use crate::cs::dynamic::edit_sequence::EditCosts;

/// Computes the Levenshtein (edit) distance between two string slices.
///
/// The Levenshtein distance is defined as the minimum number of single-character
/// edits (insertions, deletions, substitutions) required to change `a` into `b`.
///
/// # Examples
///
/// ```
/// use edit_script::dynamic::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("", ""), 0);
/// assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
/// assert_eq!(levenshtein_distance("gumbo", "gambol"), 2);
/// ```
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    // If either string is empty, distance is the length of the other.
    if a.is_empty() {
        return b.chars().count();
    } else if b.is_empty() {
        return a.chars().count();
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    weighted_edit_distance(&a, &b, EditCosts::default()) as usize
}

/// Computes `D[m][n]`, the minimum total cost of turning `a` into `b` under
/// `costs`.
///
/// Uses two rolling rows and keeps no trace, so it is the cheapest way to
/// get the distance alone. Sums saturate at `u32::MAX`, exactly like the
/// script engines.
///
/// # Examples
///
/// ```
/// use edit_script::dynamic::weighted_edit_distance;
/// use edit_script::EditCosts;
///
/// let a: Vec<char> = "abc".chars().collect();
/// let b: Vec<char> = "abd".chars().collect();
/// let costs = EditCosts::new(1, 1, 5);
/// // Substituting would cost 5; removing 'c' and adding 'd' costs 2.
/// assert_eq!(weighted_edit_distance(&a, &b, costs), 2);
/// ```
pub fn weighted_edit_distance<T: PartialEq>(a: &[T], b: &[T], costs: EditCosts) -> u32 {
    let b_len = b.len();
    let mut prev_row: Vec<u32> = (0..=b_len).map(|j| top_edge(j, &costs)).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = left_edge(i + 1, &costs);

        for (j, cb) in b.iter().enumerate() {
            let edit = if ca == cb { 0 } else { costs.edit };

            //   curr_row[j+1] = minimum of:
            //     1) prev_row[j+1] + remove
            //     2) curr_row[j] + insert
            //     3) prev_row[j] + edit
            curr_row[j + 1] = prev_row[j + 1]
                .saturating_add(costs.remove)
                .min(curr_row[j].saturating_add(costs.insert))
                .min(prev_row[j].saturating_add(edit));
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
