use crate::errors::{AppError, AppResult};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

/// Schema history, applied in order. Never edit an entry once released:
/// append a new one instead.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250110_0001_initial_schema",
        description: "users, catalog, timesheets and audit log",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            first_name    TEXT NOT NULL DEFAULT '',
            last_name     TEXT NOT NULL DEFAULT '',
            role          TEXT NOT NULL CHECK(role IN ('employee','manager','admin'))
        );

        CREATE TABLE IF NOT EXISTS codes (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS modifiers (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            name    TEXT NOT NULL UNIQUE,
            minutes INTEGER DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS timesheets (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date           TEXT NOT NULL,
            start_time     TEXT,
            end_time       TEXT,
            break_duration INTEGER NOT NULL DEFAULT 0,
            description    TEXT,
            status         TEXT NOT NULL DEFAULT 'submitted'
                           CHECK(status IN ('submitted','approved','rejected')),
            code_id        INTEGER REFERENCES codes(id) ON DELETE SET NULL,
            validator_id   INTEGER REFERENCES users(id) ON DELETE SET NULL,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_timesheets_date ON timesheets(date);
        CREATE INDEX IF NOT EXISTS idx_timesheets_status ON timesheets(status);

        CREATE TABLE IF NOT EXISTS timesheet_modifiers (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            timesheet_id INTEGER NOT NULL REFERENCES timesheets(id) ON DELETE CASCADE,
            modifier_id  INTEGER NOT NULL REFERENCES modifiers(id) ON DELETE CASCADE,
            UNIQUE(timesheet_id, modifier_id)
        );

        CREATE TABLE IF NOT EXISTS audit_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT NOT NULL,
            user_id     INTEGER,
            username    TEXT,
            action      TEXT NOT NULL,
            resource    TEXT NOT NULL,
            resource_id INTEGER,
            ip_address  TEXT,
            user_agent  TEXT,
            details     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_audit_log_timestamp ON audit_log(timestamp);
        "#,
    },
    Migration {
        version: "20250302_0002_employee_type",
        description: "optional employment type on users",
        sql: "ALTER TABLE users ADD COLUMN employee_type TEXT DEFAULT 'regulier';",
    },
    Migration {
        version: "20250415_0003_unique_user_date",
        description: "at most one timesheet per user and date",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_timesheets_user_date
            ON timesheets(user_id, date);
        "#,
    },
    Migration {
        version: "20250415_0004_audit_append_only",
        description: "reject UPDATE and DELETE on audit_log",
        sql: r#"
        CREATE TRIGGER IF NOT EXISTS audit_log_no_update
        BEFORE UPDATE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS audit_log_no_delete
        BEFORE DELETE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;
        "#,
    },
];

fn ensure_migrations_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version     TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM schema_migrations WHERE version = ?1",
            [version],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row, so a failure leaves the schema at the previous version.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_migrations_table(conn)?;

    let mut applied = 0;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }

        let tx = conn.unchecked_transaction()?;

        tx.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

        tx.execute(
            "INSERT INTO schema_migrations (version, description, applied_at)
             VALUES (?1, ?2, ?3)",
            params![m.version, m.description, Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;

        info!(version = m.version, "migration applied: {}", m.description);
        applied += 1;
    }

    Ok(applied)
}

/// Versions recorded in `schema_migrations`, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_migrations_table(conn)?;

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
