//! SQLite connection wrapper (one connection per command invocation).

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> Result<()> {
        // ON DELETE CASCADE on timesheet_modifiers relies on this
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    }
}
