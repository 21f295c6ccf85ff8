//! Local session file, `<database>.session`.
//!
//! Holds the request context of the last successful login. The role is
//! re-read from the database on every use, so editing the file grants
//! nothing.

use crate::core::context::{RequestContext, RequestSource};
use crate::db::users::find_user;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub context: RequestContext,
    pub started_at: DateTime<Utc>,
}

pub fn session_path(database: &str) -> PathBuf {
    PathBuf::from(format!("{database}.session"))
}

pub fn save(database: &str, ctx: &RequestContext) -> AppResult<()> {
    let session = Session {
        context: ctx.clone(),
        started_at: Utc::now(),
    };
    fs::write(session_path(database), serde_yaml::to_string(&session)?)?;
    Ok(())
}

pub fn load(database: &str) -> AppResult<Option<Session>> {
    let path = session_path(database);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)?;
    Ok(Some(serde_yaml::from_str(&raw)?))
}

/// Remove the session file. `false` when there was none.
pub fn clear(database: &str) -> AppResult<bool> {
    let path = session_path(database);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

/// Context of the logged-in user, checked against the database.
pub fn require(conn: &Connection, database: &str) -> AppResult<RequestContext> {
    let session = load(database)?.ok_or(AppError::NotLoggedIn)?;
    let stored = session.context;

    let user = match find_user(conn, stored.user_id)? {
        Some(u) if u.username == stored.username => u,
        _ => {
            debug!(user_id = stored.user_id, "session refers to a missing user");
            clear(database)?;
            return Err(AppError::NotLoggedIn);
        }
    };

    Ok(RequestContext::new(
        user.id,
        &user.username,
        user.role,
        RequestSource::local(),
    ))
}
