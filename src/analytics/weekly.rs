use chrono::NaiveDate;
use serde::Serialize;

use crate::store::Records;
use crate::types::CategoryEmissions;
use crate::util::{month_start, shift_days};

/// Days covered by the weekly views, the reference day included.
pub const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub emissions: CategoryEmissions,
}

fn week_window(reference: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..WEEK_DAYS)
        .rev()
        .map(move |back| shift_days(reference, -back))
}

/// Totals for the six days before `reference` and `reference` itself,
/// oldest first. Days without a record count as zero.
pub fn weekly_series(records: &Records, reference: NaiveDate) -> Vec<DailyTotal> {
    week_window(reference)
        .map(|date| DailyTotal {
            date,
            total: records.get(&date).map_or(0.0, |r| r.emissions.total),
        })
        .collect()
}

/// Same window as [`weekly_series`] with every category kept.
pub fn weekly_breakdown(records: &Records, reference: NaiveDate) -> Vec<DailyBreakdown> {
    week_window(reference)
        .map(|date| DailyBreakdown {
            date,
            emissions: records
                .get(&date)
                .map(|r| r.emissions)
                .unwrap_or_default(),
        })
        .collect()
}

/// Sum of stored totals from the 1st of the month through `reference`.
pub fn monthly_total(records: &Records, reference: NaiveDate) -> f64 {
    records
        .range(month_start(reference)..=reference)
        .map(|(_, record)| record.emissions.total)
        .sum()
}
