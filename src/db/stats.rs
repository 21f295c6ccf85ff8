use crate::db::{timesheets, users};
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::models::timesheet::TimesheetStatus;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub employees: i64,
    pub managers: i64,
    pub admins: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TimesheetStats {
    pub total: i64,
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemStats {
    pub users: UserStats,
    pub timesheets: TimesheetStats,
    pub audit_entries: i64,
}

pub fn collect_stats(conn: &Connection) -> AppResult<SystemStats> {
    //
    // 1) USERS BY ROLE
    //
    let employees = users::count_by_role(conn, Role::Employee)?;
    let managers = users::count_by_role(conn, Role::Manager)?;
    let admins = users::count_by_role(conn, Role::Admin)?;

    //
    // 2) TIMESHEETS BY STATUS
    //
    let submitted = timesheets::count_by_status(conn, TimesheetStatus::Submitted)?;
    let approved = timesheets::count_by_status(conn, TimesheetStatus::Approved)?;
    let rejected = timesheets::count_by_status(conn, TimesheetStatus::Rejected)?;

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = conn
        .query_row(
            "SELECT date FROM timesheets ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = conn
        .query_row(
            "SELECT date FROM timesheets ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    //
    // 4) AUDIT VOLUME
    //
    let audit_entries: i64 = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;

    Ok(SystemStats {
        users: UserStats {
            total: employees + managers + admins,
            employees,
            managers,
            admins,
        },
        timesheets: TimesheetStats {
            total: submitted + approved + rejected,
            submitted,
            approved,
            rejected,
            first_date,
            last_date,
        },
        audit_entries,
    })
}
