mod common;

use chrono::NaiveTime;
use common::d;
use timeportal::core::calculator::hours::{compute_hours, format_hours};
use timeportal::core::calculator::totals::{approved_hours, hours_by, sum_hours};
use timeportal::models::catalog::Modifier;
use timeportal::models::timesheet::{Timesheet, TimesheetStatus};

fn t(s: &str) -> Option<NaiveTime> {
    Some(NaiveTime::parse_from_str(s, "%H:%M").expect("valid time"))
}

fn record(id: i64, user_id: i64, date: &str, status: TimesheetStatus) -> Timesheet {
    Timesheet {
        id,
        user_id,
        date: d(date),
        start_time: t("09:00"),
        end_time: t("17:00"),
        break_minutes: 60,
        description: None,
        status,
        code: None,
        validator_id: None,
        modifiers: Vec::new(),
    }
}

#[test]
fn test_full_day_minus_break() {
    let h = compute_hours(d("2025-01-06"), t("09:00"), t("17:00"), 60, &[]);
    assert_eq!(h, 7.0);
}

#[test]
fn test_negative_modifier_is_added() {
    let h = compute_hours(
        d("2025-01-06"),
        t("09:00"),
        t("17:00"),
        60,
        &[Modifier::offset(-30)],
    );
    assert_eq!(h, 6.5);
}

#[test]
fn test_modifier_without_offset_is_ignored() {
    let unset = Modifier {
        id: 7,
        name: "Note".to_string(),
        minutes: None,
    };
    let h = compute_hours(d("2025-01-06"), t("08:00"), t("12:00"), 0, &[unset]);
    assert_eq!(h, 4.0);
}

#[test]
fn test_missing_start_or_end_gives_zero() {
    assert_eq!(compute_hours(d("2025-01-06"), None, t("17:00"), 0, &[]), 0.0);
    assert_eq!(compute_hours(d("2025-01-06"), t("09:00"), None, 0, &[]), 0.0);
}

#[test]
fn test_overnight_shift_clamps_to_zero() {
    let h = compute_hours(d("2025-01-06"), t("22:00"), t("06:00"), 0, &[]);
    assert_eq!(h, 0.0);
}

#[test]
fn test_never_negative() {
    let h = compute_hours(d("2025-01-06"), t("09:00"), t("09:30"), 45, &[Modifier::offset(-60)]);
    assert_eq!(h, 0.0);
}

#[test]
fn test_format_hours_two_decimals() {
    assert_eq!(format_hours(7.0), "7.00");
    assert_eq!(format_hours(6.5), "6.50");
}

#[test]
fn test_total_hours_follows_current_modifiers() {
    let mut ts = record(1, 1, "2025-01-06", TimesheetStatus::Submitted);
    assert_eq!(ts.total_hours(), 7.0);

    ts.modifiers.push(Modifier::offset(-30));
    assert_eq!(ts.total_hours(), 6.5);
}

#[test]
fn test_totals_and_grouping() {
    let records = [
        record(1, 1, "2025-01-06", TimesheetStatus::Approved),
        record(2, 1, "2025-01-07", TimesheetStatus::Submitted),
        record(3, 2, "2025-01-06", TimesheetStatus::Rejected),
        record(4, 2, "2025-01-07", TimesheetStatus::Approved),
    ];

    assert_eq!(sum_hours(&records), 28.0);
    assert_eq!(approved_hours(&records), 14.0);

    let per_user = hours_by(&records, |r| r.user_id);
    assert_eq!(per_user.get(&1), Some(&14.0));
    assert_eq!(per_user.get(&2), Some(&14.0));
}

#[test]
fn test_extreme_break_and_offsets_do_not_overflow() {
    let huge_break = compute_hours(d("2025-01-06"), t("09:00"), t("17:00"), i64::MAX, &[]);
    assert_eq!(huge_break, 0.0);

    let huge_bonus = compute_hours(
        d("2025-01-06"),
        t("09:00"),
        t("17:00"),
        0,
        &[Modifier::offset(i64::MAX), Modifier::offset(i64::MAX)],
    );
    assert!(huge_bonus.is_finite());
    assert!(huge_bonus > 0.0);

    let huge_penalty = compute_hours(
        d("2025-01-06"),
        t("09:00"),
        t("17:00"),
        0,
        &[Modifier::offset(i64::MIN)],
    );
    assert_eq!(huge_penalty, 0.0);
}
