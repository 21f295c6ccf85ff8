//! Approved-hours reports and system statistics.

use crate::core::calculator::totals::{approved_hours, hours_by};
use crate::core::context::RequestContext;
use crate::db::stats::{SystemStats, collect_stats};
use crate::db::timesheets::{TimesheetFilter, query_timesheets};
use crate::db::users::list_users;
use crate::errors::{AppError, AppResult};
use crate::models::role::{Capability, Role};
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use crate::utils::date::month_start;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Inclusive date bounds of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if from > to {
            return Err(AppError::validation(format!(
                "report start {} is after its end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Current month up to today.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            from: month_start(today),
            to: today,
        }
    }

    /// `days` days back from today, today included.
    pub fn trailing(today: NaiveDate, days: u64) -> Self {
        Self {
            from: today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN),
            to: today,
        }
    }
}

/// Default span of the activity report.
pub const ACTIVITY_DAYS: u64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeHours {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    /// Records in the range, whatever their status.
    pub submitted: usize,
    /// Approved records.
    pub days: usize,
    pub hours: f64,
}

/// One line of the activity report.
#[derive(Debug, Clone, Serialize)]
pub struct UserActivity {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub submitted: usize,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DayHours {
    pub date: NaiveDate,
    pub employee: f64,
    pub manager: f64,
    pub admin: f64,
    pub total: f64,
}

fn records_in(
    conn: &rusqlite::Connection,
    range: &ReportRange,
    status: Option<TimesheetStatus>,
) -> AppResult<Vec<Timesheet>> {
    query_timesheets(
        conn,
        &TimesheetFilter {
            from: Some(range.from),
            to: Some(range.to),
            status,
            ..Default::default()
        },
    )
}

/// Record count and approved hours of one user.
fn tally(records: &[Timesheet], user_id: i64) -> (usize, usize, f64) {
    let own: Vec<&Timesheet> = records.iter().filter(|r| r.user_id == user_id).collect();
    let approved = own
        .iter()
        .filter(|r| r.status == TimesheetStatus::Approved)
        .count();
    (own.len(), approved, approved_hours(own))
}

/// Approved hours per employee; employees without approved days show 0.
pub fn hours_by_employee(
    conn: &rusqlite::Connection,
    ctx: &RequestContext,
    range: &ReportRange,
) -> AppResult<Vec<EmployeeHours>> {
    ctx.require(Capability::ViewReports)?;

    let records = records_in(conn, range, None)?;
    let users = list_users(conn)?;

    let mut rows: Vec<EmployeeHours> = users
        .iter()
        .filter(|u| {
            u.role == Role::Employee
                || records
                    .iter()
                    .any(|r| r.user_id == u.id && r.status == TimesheetStatus::Approved)
        })
        .map(|u| {
            let (submitted, days, hours) = tally(&records, u.id);
            EmployeeHours {
                user_id: u.id,
                username: u.username.clone(),
                full_name: u.full_name(),
                submitted,
                days,
                hours,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(rows)
}

/// Every account with its record count and approved hours in the range.
pub fn user_activity(
    conn: &rusqlite::Connection,
    ctx: &RequestContext,
    range: &ReportRange,
) -> AppResult<Vec<UserActivity>> {
    ctx.require(Capability::ManageUsers)?;

    let records = records_in(conn, range, None)?;

    Ok(list_users(conn)?
        .into_iter()
        .map(|u| {
            let (submitted, _, hours) = tally(&records, u.id);
            UserActivity {
                user_id: u.id,
                full_name: u.full_name(),
                username: u.username,
                role: u.role,
                submitted,
                hours,
            }
        })
        .collect())
}

/// Approved hours per calendar day, split by the role of the record owner.
pub fn hours_by_day(
    conn: &rusqlite::Connection,
    ctx: &RequestContext,
    range: &ReportRange,
) -> AppResult<Vec<DayHours>> {
    ctx.require(Capability::ViewReports)?;

    let records = records_in(conn, range, Some(TimesheetStatus::Approved))?;
    let roles: HashMap<i64, Role> = list_users(conn)?.into_iter().map(|u| (u.id, u.role)).collect();

    let mut days: BTreeMap<NaiveDate, DayHours> = BTreeMap::new();
    for role in Role::ALL {
        let per_day = hours_by(
            records
                .iter()
                .filter(|r| roles.get(&r.user_id) == Some(&role)),
            |r| r.date,
        );
        for (date, hours) in per_day {
            let day = days.entry(date).or_insert_with(|| DayHours {
                date,
                ..Default::default()
            });
            match role {
                Role::Employee => day.employee += hours,
                Role::Manager => day.manager += hours,
                Role::Admin => day.admin += hours,
            }
            day.total += hours;
        }
    }

    Ok(days.into_values().collect())
}

pub fn system_stats(conn: &rusqlite::Connection, ctx: &RequestContext) -> AppResult<SystemStats> {
    ctx.require(Capability::ViewAudit)?;
    collect_stats(conn)
}
