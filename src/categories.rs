//! Generic category breakdown: group a record list by a category key and
//! accumulate a numeric measure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sums `amount_of` per category and returns the totals sorted descending,
/// ties broken by first appearance in the input (stable across runs).
///
/// The sum of the returned totals always equals the grand total of the
/// input under the same selector. Empty input yields an empty vec.
pub fn totals_by_category<T, C, A>(records: &[T], category_of: C, amount_of: A) -> Vec<CategoryTotal>
where
    C: Fn(&T) -> &str,
    A: Fn(&T) -> f64,
{
    // (first-seen index, running total) per category.
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut next_index = 0usize;

    for record in records {
        let entry = totals.entry(category_of(record)).or_insert_with(|| {
            let idx = next_index;
            next_index += 1;
            (idx, 0.0)
        });
        entry.1 += amount_of(record);
    }

    let mut out: Vec<(usize, CategoryTotal)> = totals
        .into_iter()
        .map(|(category, (idx, total))| {
            (
                idx,
                CategoryTotal {
                    category: category.to_string(),
                    total,
                },
            )
        })
        .collect();

    out.sort_by(|(a_idx, a), (b_idx, b)| b.total.total_cmp(&a.total).then(a_idx.cmp(b_idx)));

    out.into_iter().map(|(_, t)| t).collect()
}
