//! Codes and modifiers: small lookup tables referenced by timesheets.

use crate::errors::AppResult;
use crate::models::catalog::{Code, Modifier};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_code(row: &Row) -> Result<Code> {
    Ok(Code {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub fn map_modifier(row: &Row) -> Result<Modifier> {
    Ok(Modifier {
        id: row.get("id")?,
        name: row.get("name")?,
        minutes: row.get("minutes")?,
    })
}

pub fn list_codes(conn: &Connection) -> AppResult<Vec<Code>> {
    let mut stmt = conn.prepare("SELECT id, name FROM codes ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_code)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Case-insensitive lookup, so `presence` finds `Presence`.
pub fn find_code_by_name(conn: &Connection, name: &str) -> AppResult<Option<Code>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM codes WHERE name = ?1 COLLATE NOCASE",
            [name.trim()],
            map_code,
        )
        .optional()?)
}

pub fn insert_code(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute("INSERT INTO codes (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_modifiers(conn: &Connection) -> AppResult<Vec<Modifier>> {
    let mut stmt = conn.prepare("SELECT id, name, minutes FROM modifiers ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_modifier)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_modifier_by_name(conn: &Connection, name: &str) -> AppResult<Option<Modifier>> {
    Ok(conn
        .query_row(
            "SELECT id, name, minutes FROM modifiers WHERE name = ?1 COLLATE NOCASE",
            [name.trim()],
            map_modifier,
        )
        .optional()?)
}

pub fn insert_modifier(conn: &Connection, name: &str, minutes: Option<i64>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO modifiers (name, minutes) VALUES (?1, ?2)",
        params![name, minutes],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Change a modifier's offset. Affects the computed hours of every record
/// it is attached to, including already decided ones.
pub fn update_modifier_minutes(conn: &Connection, id: i64, minutes: Option<i64>) -> AppResult<()> {
    conn.execute(
        "UPDATE modifiers SET minutes = ?1 WHERE id = ?2",
        params![minutes, id],
    )?;
    Ok(())
}
