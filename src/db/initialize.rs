use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring the schema up to date. Tables only ever come from migrations.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    let applied = run_pending_migrations(conn)?;
    if applied > 0 {
        tracing::info!(applied, "database schema upgraded");
    }
    Ok(())
}

/// Open the database at `path` and make sure its schema is current.
/// Every command goes through here, so older files upgrade transparently.
pub fn open_db(path: &str) -> AppResult<DbPool> {
    let pool = DbPool::new(path)?;
    init_db(&pool.conn)?;
    Ok(pool)
}
