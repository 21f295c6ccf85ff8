use crate::cli::commands::{open_session, status_filter};
use crate::cli::parser::{Commands, ExportKindArg};
use crate::config::Config;
use crate::db::audit_log::AuditFilter;
use crate::db::timesheets::TimesheetFilter;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFilter, ExportFormat, ExportKind, ExportLogic};
use crate::models::audit::AuditAction;
use crate::ui::messages::warning;
use crate::utils::range::parse_range;
use std::path::Path;

pub(crate) fn parse_action(raw: &str) -> AppResult<AuditAction> {
    AuditAction::from_db_str(raw.trim())
        .ok_or_else(|| AppError::validation(format!("unknown audit action '{}'", raw)))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        kind,
        format,
        file,
        range,
        user,
        status,
        action,
        username,
        force,
    } = cmd
    {
        // unsupported formats are refused before anything else happens
        format.parse::<ExportFormat>()?;

        let kind = match kind {
            ExportKindArg::Users => ExportKind::Users,
            ExportKindArg::Timesheets => ExportKind::Timesheets,
            ExportKindArg::Complete => ExportKind::Complete,
            ExportKindArg::Audit => ExportKind::Audit,
        };

        let bounds = match range {
            Some(r) => parse_range(r)?,
            None => None,
        };

        let filter = ExportFilter {
            timesheets: TimesheetFilter {
                user_id: *user,
                from: bounds.map(|b| b.0),
                to: bounds.map(|b| b.1),
                status: status_filter(*status),
            },
            audit: AuditFilter {
                action: action.as_deref().map(parse_action).transpose()?,
                username: username.clone(),
                from: bounds.map(|b| b.0),
                to: bounds.map(|b| b.1),
            },
        };

        let (pool, ctx) = open_session(cfg)?;
        let rows = ExportLogic::export(&pool.conn, &ctx, kind, format, Path::new(file), &filter, *force)?;

        if rows == 0 {
            warning("No rows matched: the export contains headers only.");
        }
    }
    Ok(())
}
