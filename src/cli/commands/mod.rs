pub mod approve;
pub mod catalog;
pub mod config;
pub mod db;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod login;
pub mod period;
pub mod report;
pub mod seed;
pub mod submit;
pub mod user;

use crate::cli::parser::StatusArg;
use crate::cli::session;
use crate::config::Config;
use crate::core::context::RequestContext;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::timesheet::TimesheetStatus;
use std::path::Path;

/// Open the configured database; it must have been created by `init`.
pub(crate) fn open(cfg: &Config) -> AppResult<DbPool> {
    if !Path::new(&cfg.database).exists() {
        return Err(AppError::Config(format!(
            "database not found at {} (run `timeportal init` first)",
            cfg.database
        )));
    }
    open_db(&cfg.database)
}

/// Database plus the context of the logged-in user.
pub(crate) fn open_session(cfg: &Config) -> AppResult<(DbPool, RequestContext)> {
    let pool = open(cfg)?;
    let ctx = session::require(&pool.conn, &cfg.database)?;
    Ok((pool, ctx))
}

pub(crate) fn status_filter(arg: Option<StatusArg>) -> Option<TimesheetStatus> {
    arg.map(|s| match s {
        StatusArg::Submitted => TimesheetStatus::Submitted,
        StatusArg::Approved => TimesheetStatus::Approved,
        StatusArg::Rejected => TimesheetStatus::Rejected,
    })
}
