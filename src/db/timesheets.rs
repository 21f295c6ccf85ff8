use crate::errors::{AppError, AppResult};
use crate::models::catalog::{Code, Modifier};
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const SELECT_TIMESHEET: &str = "
    SELECT t.id, t.user_id, t.date, t.start_time, t.end_time, t.break_duration,
           t.description, t.status, t.code_id, c.name AS code_name, t.validator_id
    FROM timesheets t
    LEFT JOIN codes c ON c.id = t.code_id";

/// Filter for record queries. Every field is optional; bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TimesheetFilter {
    pub user_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<TimesheetStatus>,
}

fn conversion_error(msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Validation(msg)),
    )
}

fn parse_opt_time(raw: Option<String>) -> Result<Option<NaiveTime>> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
            .map(Some)
            .map_err(|_| conversion_error(format!("invalid time: {}", s))),
    }
}

/// Mapping DB → Timesheet, without modifiers (see `attach_modifiers`).
fn map_row(row: &Row) -> Result<Timesheet> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(format!("invalid date: {}", date_str)))?;

    let status_str: String = row.get("status")?;
    let status = TimesheetStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(format!("invalid status: {}", status_str)))?;

    let code_id: Option<i64> = row.get("code_id")?;
    let code_name: Option<String> = row.get("code_name")?;
    let code = match (code_id, code_name) {
        (Some(id), Some(name)) => Some(Code { id, name }),
        _ => None,
    };

    Ok(Timesheet {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date,
        start_time: parse_opt_time(row.get("start_time")?)?,
        end_time: parse_opt_time(row.get("end_time")?)?,
        break_minutes: row.get("break_duration")?,
        description: row.get("description")?,
        status,
        code,
        validator_id: row.get("validator_id")?,
        modifiers: Vec::new(),
    })
}

pub fn load_modifiers(conn: &Connection, timesheet_id: i64) -> AppResult<Vec<Modifier>> {
    let mut stmt = conn.prepare_cached(
        "SELECT m.id, m.name, m.minutes
         FROM timesheet_modifiers tm
         JOIN modifiers m ON m.id = tm.modifier_id
         WHERE tm.timesheet_id = ?1
         ORDER BY m.name ASC",
    )?;
    let rows = stmt.query_map([timesheet_id], crate::db::catalog::map_modifier)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn attach_modifiers(conn: &Connection, mut ts: Timesheet) -> AppResult<Timesheet> {
    ts.modifiers = load_modifiers(conn, ts.id)?;
    Ok(ts)
}

pub fn find_timesheet(conn: &Connection, id: i64) -> AppResult<Option<Timesheet>> {
    let sql = format!("{SELECT_TIMESHEET} WHERE t.id = ?1");
    let found = conn.query_row(&sql, [id], map_row).optional()?;
    found.map(|ts| attach_modifiers(conn, ts)).transpose()
}

pub fn find_by_user_and_date(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> AppResult<Option<Timesheet>> {
    let sql = format!("{SELECT_TIMESHEET} WHERE t.user_id = ?1 AND t.date = ?2");
    let found = conn
        .query_row(
            &sql,
            params![user_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )
        .optional()?;
    found.map(|ts| attach_modifiers(conn, ts)).transpose()
}

/// Records matching `filter`, most recent date first.
pub fn query_timesheets(conn: &Connection, filter: &TimesheetFilter) -> AppResult<Vec<Timesheet>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(uid) = filter.user_id {
        clauses.push("t.user_id = ?");
        values.push(Value::Integer(uid));
    }
    if let Some(from) = filter.from {
        clauses.push("t.date >= ?");
        values.push(Value::Text(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.to {
        clauses.push("t.date <= ?");
        values.push(Value::Text(to.format("%Y-%m-%d").to_string()));
    }
    if let Some(status) = filter.status {
        clauses.push("t.status = ?");
        values.push(Value::Text(status.to_db_str().to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let sql = format!("{SELECT_TIMESHEET}{where_sql} ORDER BY t.date DESC, t.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(attach_modifiers(conn, r?)?);
    }
    Ok(out)
}

fn time_param(t: Option<NaiveTime>) -> Option<String> {
    t.map(|t| t.format("%H:%M").to_string())
}

/// Insert a record (the `id` field is ignored) and return the new id.
pub fn insert_timesheet(conn: &Connection, ts: &Timesheet) -> AppResult<i64> {
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO timesheets (user_id, date, start_time, end_time, break_duration,
                                 description, status, code_id, validator_id,
                                 created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            ts.user_id,
            ts.date_str(),
            time_param(ts.start_time),
            time_param(ts.end_time),
            ts.break_minutes,
            ts.description,
            ts.status.to_db_str(),
            ts.code.as_ref().map(|c| c.id),
            ts.validator_id,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a record (all fields except id and owner)
pub fn update_timesheet(conn: &Connection, ts: &Timesheet) -> AppResult<()> {
    conn.execute(
        "UPDATE timesheets
         SET date = ?1, start_time = ?2, end_time = ?3, break_duration = ?4,
             description = ?5, status = ?6, code_id = ?7, validator_id = ?8,
             updated_at = ?9
         WHERE id = ?10",
        params![
            ts.date_str(),
            time_param(ts.start_time),
            time_param(ts.end_time),
            ts.break_minutes,
            ts.description,
            ts.status.to_db_str(),
            ts.code.as_ref().map(|c| c.id),
            ts.validator_id,
            Utc::now().to_rfc3339(),
            ts.id,
        ],
    )?;
    Ok(())
}

/// Replace the modifier associations of a record.
pub fn replace_modifiers(conn: &Connection, timesheet_id: i64, modifier_ids: &[i64]) -> AppResult<()> {
    conn.execute(
        "DELETE FROM timesheet_modifiers WHERE timesheet_id = ?1",
        [timesheet_id],
    )?;

    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO timesheet_modifiers (timesheet_id, modifier_id) VALUES (?1, ?2)",
    )?;
    for mid in modifier_ids {
        stmt.execute(params![timesheet_id, mid])?;
    }
    Ok(())
}

pub fn set_status(
    conn: &Connection,
    id: i64,
    status: TimesheetStatus,
    validator_id: Option<i64>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE timesheets SET status = ?1, validator_id = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            status.to_db_str(),
            validator_id,
            Utc::now().to_rfc3339(),
            id
        ],
    )?;
    Ok(())
}

/// Remove every record owned by `user_id` (modifier links cascade).
pub fn delete_owned_by(conn: &Connection, user_id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM timesheets WHERE user_id = ?1", [user_id])?)
}

/// Forget `validator_id` on the records it decided; the records stay.
pub fn clear_validator(conn: &Connection, validator_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE timesheets SET validator_id = NULL WHERE validator_id = ?1",
        [validator_id],
    )?)
}

pub fn count_by_status(conn: &Connection, status: TimesheetStatus) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM timesheets WHERE status = ?1",
        [status.to_db_str()],
        |row| row.get(0),
    )?)
}
