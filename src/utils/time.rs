//! Time utilities: parsing HH:MM and formatting minute offsets.

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Empty input means "not filled in".
pub fn parse_optional_time(input: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_time(s)
            .map(Some)
            .ok_or_else(|| AppError::validation(format!("invalid time '{}' (expected HH:MM)", s))),
    }
}

/// Signed minutes as `+00:30` / `-00:30`.
pub fn format_offset(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "+" };
    let m = mins.abs();
    format!("{}{:02}:{:02}", sign, m / 60, m % 60)
}
