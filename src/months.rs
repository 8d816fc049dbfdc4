//! Month-by-month cash-flow series.
//!
//! Given an inclusive date range, one bucket is generated per calendar
//! month spanned by the range (partial first and last months included) and
//! each dated measure is added to the bucket matching its month. Measures
//! dated outside the range never touch any bucket; measures with no date
//! are skipped, counted and logged, never fatal.

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{InsightsError, Result};
use crate::utils::{first_day_of_month, months_back, months_between};

/// Calendar-month key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    Revenue,
    Expense,
}

/// One dated measure extracted from a realized record. `date` is `None`
/// when the source record lacked the field needed for bucketing.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyPoint {
    pub date: Option<NaiveDate>,
    pub kind: MeasureKind,
    pub amount: f64,
}

impl MonthlyPoint {
    pub fn revenue(date: Option<NaiveDate>, amount: f64) -> Self {
        Self {
            date,
            kind: MeasureKind::Revenue,
            amount,
        }
    }

    pub fn expense(date: Option<NaiveDate>, amount: f64) -> Self {
        Self {
            date,
            kind: MeasureKind::Expense,
            amount,
        }
    }
}

/// Realized revenue and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub label: String,
    pub revenue_total: f64,
    pub expense_total: f64,
}

/// Output of [`build_month_series`]: the contiguous buckets plus how many
/// undated points had to be skipped.
#[derive(Debug, Clone)]
pub struct MonthSeries {
    pub buckets: Vec<MonthBucket>,
    pub skipped: usize,
}

/// Default trailing window: first day of the month six months before
/// `today`, through `today`.
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (months_back(today, 6), today)
}

/// Builds the bucket series for `[start, end]` and assigns every dated
/// point to its month. Bucket count is always
/// `months_between(start, end) + 1`.
pub fn build_month_series(
    start: NaiveDate,
    end: NaiveDate,
    points: &[MonthlyPoint],
) -> Result<MonthSeries> {
    if end < start {
        return Err(InsightsError::InvalidRange {
            from: start,
            to: end,
        });
    }

    // 1. Normalize to the first day of the start month and lay out one
    //    bucket per month through the month containing `end`.
    let normalized = first_day_of_month(start.year(), start.month());
    let span = months_between(normalized, end) + 1;

    let mut buckets = Vec::with_capacity(span as usize);
    let mut index: HashMap<YearMonth, usize> = HashMap::new();

    let mut year = normalized.year();
    let mut month = normalized.month();
    for _ in 0..span {
        let key = YearMonth { year, month };
        index.insert(key, buckets.len());
        buckets.push(MonthBucket {
            month: key,
            label: key.label(),
            revenue_total: 0.0,
            expense_total: 0.0,
        });

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    // 2. Assign each point. Undated points are skipped; points dated
    //    outside [start, end] must not affect any bucket.
    let mut skipped = 0usize;
    for point in points {
        let date = match point.date {
            Some(date) => date,
            None => {
                skipped += 1;
                continue;
            }
        };

        if date < start || date > end {
            continue;
        }

        if let Some(&i) = index.get(&YearMonth::of(date)) {
            match point.kind {
                MeasureKind::Revenue => buckets[i].revenue_total += point.amount,
                MeasureKind::Expense => buckets[i].expense_total += point.amount,
            }
        }
    }

    if skipped > 0 {
        warn!("month series skipped {} undated measure(s)", skipped);
    }

    Ok(MonthSeries { buckets, skipped })
}
