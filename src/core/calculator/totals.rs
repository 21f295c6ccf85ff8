use crate::models::timesheet::{Timesheet, TimesheetStatus};
use std::collections::BTreeMap;

/// Sum of computed hours over a set of records.
pub fn sum_hours<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a Timesheet>,
{
    records.into_iter().map(Timesheet::total_hours).sum()
}

/// Sum of computed hours restricted to approved records.
pub fn approved_hours<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a Timesheet>,
{
    sum_hours(
        records
            .into_iter()
            .filter(|t| t.status == TimesheetStatus::Approved),
    )
}

/// Hours grouped by an arbitrary key, ordered by key.
pub fn hours_by<'a, K, I, F>(records: I, key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = &'a Timesheet>,
    F: Fn(&Timesheet) -> K,
{
    let mut out = BTreeMap::new();
    for t in records {
        *out.entry(key(t)).or_insert(0.0) += t.total_hours();
    }
    out
}
