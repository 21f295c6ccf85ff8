//! `audit_log` table. Insert and read only: the schema rejects UPDATE and
//! DELETE on this table.

use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditEntry, AuditResource};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeDelta, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOrder {
    NewestFirst,
    OldestFirst,
}

/// Filters of the audit log screen and export.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    /// Case-insensitive substring of the stored username.
    pub username: Option<String>,
    pub from: Option<NaiveDate>,
    /// Inclusive: the whole `to` day is kept.
    pub to: Option<NaiveDate>,
}

/// Fixed-width UTC timestamp, so that text order is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Validation(msg)),
    )
}

fn map_entry(row: &Row) -> Result<AuditEntry> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| conversion_error(format!("invalid timestamp: {}", ts_str)))?;

    let action_str: String = row.get("action")?;
    let action = AuditAction::from_db_str(&action_str)
        .ok_or_else(|| conversion_error(format!("invalid action: {}", action_str)))?;

    let resource_str: String = row.get("resource")?;
    let resource = AuditResource::from_db_str(&resource_str)
        .ok_or_else(|| conversion_error(format!("invalid resource: {}", resource_str)))?;

    Ok(AuditEntry {
        id: row.get("id")?,
        timestamp,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        action,
        resource,
        resource_id: row.get("resource_id")?,
        ip_address: row.get("ip_address")?,
        user_agent: row.get("user_agent")?,
        details: row.get("details")?,
    })
}

pub fn insert_entry(conn: &Connection, entry: &AuditEntry) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO audit_log (timestamp, user_id, username, action, resource,
                                resource_id, ip_address, user_agent, details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;

    stmt.execute(params![
        format_timestamp(&entry.timestamp),
        entry.user_id,
        entry.username,
        entry.action.as_str(),
        entry.resource.as_str(),
        entry.resource_id,
        entry.ip_address,
        entry.user_agent,
        entry.details,
    ])?;

    Ok(conn.last_insert_rowid())
}

/// Timestamp of the most recent entry, if any.
pub fn last_timestamp(conn: &Connection) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = conn
        .query_row("SELECT MAX(timestamp) FROM audit_log", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc)))
}

pub fn query_entries(
    conn: &Connection,
    filter: &AuditFilter,
    order: AuditOrder,
) -> AppResult<Vec<AuditEntry>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(action) = filter.action {
        clauses.push("action = ?");
        values.push(Value::Text(action.as_str().to_string()));
    }
    if let Some(name) = filter.username.as_deref().filter(|n| !n.is_empty()) {
        // LIKE is case-insensitive for ASCII in SQLite
        clauses.push("username LIKE ?");
        values.push(Value::Text(format!("%{}%", name)));
    }
    if let Some(from) = filter.from {
        clauses.push("timestamp >= ?");
        values.push(Value::Text(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.to {
        clauses.push("timestamp < ?");
        let next = to + TimeDelta::days(1);
        values.push(Value::Text(next.format("%Y-%m-%d").to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let order_sql = match order {
        AuditOrder::NewestFirst => "timestamp DESC, id DESC",
        AuditOrder::OldestFirst => "timestamp ASC, id ASC",
    };

    let sql = format!(
        "SELECT id, timestamp, user_id, username, action, resource, resource_id,
                ip_address, user_agent, details
         FROM audit_log{where_sql}
         ORDER BY {order_sql}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Distinct actions present in the log, for filter hints.
pub fn distinct_actions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT action FROM audit_log ORDER BY action ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
