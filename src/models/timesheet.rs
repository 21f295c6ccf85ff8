use super::catalog::{Code, Modifier};
use crate::core::calculator::hours::compute_hours;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Submitted,
    Approved,
    Rejected,
}

impl TimesheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(TimesheetStatus::Submitted),
            "approved" => Some(TimesheetStatus::Approved),
            "rejected" => Some(TimesheetStatus::Rejected),
            _ => None,
        }
    }

    /// A decided record is frozen for its owner.
    pub fn is_decided(&self) -> bool {
        !matches!(self, TimesheetStatus::Submitted)
    }
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's one day of work.
#[derive(Debug, Clone, Serialize)]
pub struct Timesheet {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,                 // ⇔ timesheets.date (TEXT "YYYY-MM-DD")
    pub start_time: Option<NaiveTime>,   // ⇔ timesheets.start_time (TEXT "HH:MM")
    pub end_time: Option<NaiveTime>,     // ⇔ timesheets.end_time (TEXT "HH:MM")
    pub break_minutes: i64,              // ⇔ timesheets.break_duration
    pub description: Option<String>,
    pub status: TimesheetStatus,
    pub code: Option<Code>,
    pub validator_id: Option<i64>,
    pub modifiers: Vec<Modifier>,        // live associations, loaded with the row
}

impl Timesheet {
    /// Worked hours, always re-derived from the stored fields and the
    /// current modifier associations.
    pub fn total_hours(&self) -> f64 {
        compute_hours(
            self.date,
            self.start_time,
            self.end_time,
            self.break_minutes,
            &self.modifiers,
        )
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_str(&self) -> String {
        fmt_time(self.start_time)
    }

    pub fn end_str(&self) -> String {
        fmt_time(self.end_time)
    }

    pub fn code_name(&self) -> &str {
        self.code.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

fn fmt_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}
