mod common;

use chrono::{Datelike, NaiveDate};
use common::d;
use timeportal::core::period::{
    Period, current_period, is_read_only, next_period, period_anchor, period_dates,
    previous_period,
};
use timeportal::errors::AppError;

#[test]
fn test_anchor_is_first_monday() {
    // 2024-01-01 is a Monday, 2025-01-01 a Wednesday, 2023-01-01 a Sunday
    assert_eq!(period_anchor(2024).unwrap(), d("2024-01-01"));
    assert_eq!(period_anchor(2025).unwrap(), d("2025-01-06"));
    assert_eq!(period_anchor(2023).unwrap(), d("2023-01-02"));
}

#[test]
fn test_periods_are_fourteen_days_apart() {
    let p1 = period_dates(1, 2025).unwrap();
    let p2 = period_dates(2, 2025).unwrap();

    assert_eq!(p1[0], d("2025-01-06"));
    assert_eq!(p1[13], d("2025-01-19"));
    assert_eq!(p2[0], d("2025-01-20"));

    for w in p1.windows(2) {
        assert_eq!((w[1] - w[0]).num_days(), 1);
    }

    let p26 = Period::new(26, 2025).unwrap();
    assert_eq!((p26.start() - p1[0]).num_days(), 25 * 14);
}

#[test]
fn test_weeks_split_the_period() {
    let p = Period::new(3, 2025).unwrap();
    let [w1, w2] = p.weeks();
    assert_eq!(w1[0], p.start());
    assert_eq!(w2[6], p.end());
    assert_eq!((w2[0] - w1[0]).num_days(), 7);
}

#[test]
fn test_out_of_range_number_is_rejected() {
    assert!(matches!(Period::new(0, 2025), Err(AppError::Validation(_))));
    assert!(matches!(Period::new(27, 2025), Err(AppError::Validation(_))));
}

#[test]
fn test_navigation_wraps_inside_year() {
    assert_eq!(next_period(26), 1);
    assert_eq!(previous_period(1), 26);
    assert_eq!(next_period(5), 6);

    let last = Period::new(26, 2025).unwrap();
    let wrapped = last.next().unwrap();
    assert_eq!(wrapped.number, 1);
    assert_eq!(wrapped.year, 2025);
}

#[test]
fn test_current_period() {
    assert_eq!(current_period(d("2025-01-06")), 1);
    assert_eq!(current_period(d("2025-01-19")), 1);
    assert_eq!(current_period(d("2025-01-20")), 2);
    // before the anchor
    assert_eq!(current_period(d("2025-01-02")), 1);
    // past the 26th period
    assert_eq!(current_period(d("2024-12-31")), 26);
}

#[test]
fn test_current_period_contains_today() {
    let today = d("2025-06-18");
    let p = Period::current(today).unwrap();
    assert!(p.contains(today));
    assert!(!p.is_read_only(today));
}

#[test]
fn test_read_only_once_last_day_passed() {
    assert!(!is_read_only(1, 2025, d("2025-01-19")).unwrap());
    assert!(is_read_only(1, 2025, d("2025-01-20")).unwrap());
    assert!(!is_read_only(2, 2025, d("2025-01-06")).unwrap());
}

#[test]
fn test_resolve_defaults_to_today() {
    let today = d("2025-02-05");
    let p = Period::resolve(None, None, today).unwrap();
    assert_eq!(p.year, 2025);
    assert!(p.contains(today));

    let explicit = Period::resolve(Some(4), Some(2024), today).unwrap();
    assert_eq!(explicit.number, 4);
    assert_eq!(explicit.year, 2024);
}

#[test]
fn test_periods_at_the_end_of_the_calendar_never_panic() {
    let last_year = NaiveDate::MAX.year();

    for year in [last_year - 1, last_year, last_year + 1] {
        for number in 1..=26 {
            match Period::new(number, year) {
                Ok(p) => {
                    let dates = p.dates();
                    assert_eq!(dates[0], p.start());
                    assert_eq!(dates[13], p.end());
                    assert!(p.contains(p.end()));
                }
                Err(e) => assert!(matches!(e, AppError::Validation(_))),
            }
        }
    }

    assert!(Period::new(26, last_year).unwrap().end() <= NaiveDate::MAX);
    assert!(matches!(Period::new(26, last_year + 1), Err(AppError::Validation(_))));
}
