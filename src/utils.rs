use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::hash::Hash;

pub fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// Whole-month distance, ignoring the day component. Negative when `end`
/// is in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let year_diff = end.year() - start.year();
    let month_diff = end.month() as i32 - start.month() as i32;
    year_diff * 12 + month_diff
}

/// First day of the month `n` months before `date`'s month.
pub fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 - n as i32;
    first_day_of_month(total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

/// Builds an index from key to item for join-by-key lookups, keeping the
/// last item when keys collide.
pub fn index_by<'a, T, K, F>(items: &'a [T], key_of: F) -> HashMap<K, &'a T>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    items.iter().map(|item| (key_of(item), item)).collect()
}
