use crate::models::catalog::Modifier;
use chrono::{NaiveDate, NaiveTime};

/// Worked hours for one day.
///
/// - missing start or end → 0 (a code-only day is valid)
/// - start and end are combined with the same `date`: an end earlier than
///   the start gives a negative base, clamped to 0 below
/// - `break_minutes` is subtracted, every modifier offset that is set is added
///   (offsets may be negative)
/// - never negative, no upper bound; arithmetic saturates
pub fn compute_hours(
    date: NaiveDate,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    break_minutes: i64,
    modifiers: &[Modifier],
) -> f64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0.0;
    };

    let mut total_seconds = (date.and_time(end) - date.and_time(start)).num_seconds();

    total_seconds = total_seconds.saturating_sub(break_minutes.saturating_mul(60));

    for m in modifiers {
        if let Some(offset) = m.minutes {
            total_seconds = total_seconds.saturating_add(offset.saturating_mul(60));
        }
    }

    (total_seconds as f64 / 3600.0).max(0.0)
}

/// Two-decimal rendering used by audit payloads and exports ("7.00").
pub fn format_hours(hours: f64) -> String {
    format!("{:.2}", hours)
}
