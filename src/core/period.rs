//! Bi-weekly pay periods.
//!
//! A year has 26 periods of 14 days. Period 1 starts on the first Monday on or
//! after January 1st; period N starts `(N - 1) * 14` days later. Navigation
//! wraps inside the same year (26 → 1, 1 → 26).

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate, TimeDelta};
use serde::Serialize;
use std::fmt;

pub const PERIODS_PER_YEAR: u32 = 26;
pub const PERIOD_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub number: u32,
    pub year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

/// First Monday on or after January 1st of `year`.
pub fn period_anchor(year: i32) -> AppResult<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::validation(format!("invalid year {year}")))?;
    let offset = (7 - jan1.weekday().num_days_from_monday()) % 7;
    jan1.checked_add_days(Days::new(offset as u64))
        .ok_or_else(|| AppError::validation(format!("invalid year {year}")))
}

/// The 14 dates of period `number` in `year`, in order.
pub fn period_dates(number: u32, year: i32) -> AppResult<[NaiveDate; PERIOD_DAYS]> {
    Ok(Period::new(number, year)?.dates())
}

/// Period containing `today`, clamped into 1..=26.
pub fn current_period(today: NaiveDate) -> u32 {
    let Ok(anchor) = period_anchor(today.year()) else {
        return 1;
    };

    let weeks = (today - anchor).num_days().div_euclid(7);
    let period = weeks.div_euclid(2) + 1;

    period.clamp(1, PERIODS_PER_YEAR as i64) as u32
}

pub fn next_period(number: u32) -> u32 {
    if number >= PERIODS_PER_YEAR {
        1
    } else {
        number + 1
    }
}

pub fn previous_period(number: u32) -> u32 {
    if number <= 1 {
        PERIODS_PER_YEAR
    } else {
        number - 1
    }
}

/// A period is closed for submission once its last day is before `today`.
pub fn is_read_only(number: u32, year: i32, today: NaiveDate) -> AppResult<bool> {
    Ok(Period::new(number, year)?.is_read_only(today))
}

impl Period {
    pub fn new(number: u32, year: i32) -> AppResult<Self> {
        if !(1..=PERIODS_PER_YEAR).contains(&number) {
            return Err(AppError::validation(format!(
                "period must be between 1 and {PERIODS_PER_YEAR}, got {number}"
            )));
        }

        let out_of_range = || AppError::validation(format!("period {number}/{year} is out of range"));

        let start = period_anchor(year)?
            .checked_add_signed(TimeDelta::days((number as i64 - 1) * 14))
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add_signed(TimeDelta::days(PERIOD_DAYS as i64 - 1))
            .ok_or_else(out_of_range)?;

        Ok(Self {
            number,
            year,
            start,
            end,
        })
    }

    /// Explicit period when both parts are given, otherwise the one
    /// containing `today` (in today's year unless `year` is set).
    pub fn resolve(number: Option<u32>, year: Option<i32>, today: NaiveDate) -> AppResult<Self> {
        let year = year.unwrap_or(today.year());
        let number = number.unwrap_or_else(|| current_period(today));
        Self::new(number, year)
    }

    pub fn current(today: NaiveDate) -> AppResult<Self> {
        Self::new(current_period(today), today.year())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    // Every date up to `end` was checked in `new`.
    pub fn dates(&self) -> [NaiveDate; PERIOD_DAYS] {
        std::array::from_fn(|i| {
            self.start
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(self.end)
        })
    }

    /// The two 7-day weeks of the period.
    pub fn weeks(&self) -> [[NaiveDate; 7]; 2] {
        let dates = self.dates();
        [
            std::array::from_fn(|i| dates[i]),
            std::array::from_fn(|i| dates[i + 7]),
        ]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_read_only(&self, today: NaiveDate) -> bool {
        self.end < today
    }

    // Navigation never crosses into another year.
    pub fn next(&self) -> AppResult<Self> {
        Self::new(next_period(self.number), self.year)
    }

    pub fn previous(&self) -> AppResult<Self> {
        Self::new(previous_period(self.number), self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {}/{} ({} → {})",
            self.number,
            self.year,
            self.start.format("%Y-%m-%d"),
            self.end().format("%Y-%m-%d")
        )
    }
}
