// src/export/logic.rs

use crate::core::context::RequestContext;
use crate::db::audit_log::{AuditFilter, AuditOrder, query_entries};
use crate::db::timesheets::{TimesheetFilter, query_timesheets};
use crate::db::users::list_users;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{CsvSection, render_csv, render_json, write_output};
use crate::export::model::{
    AUDIT_HEADERS, AuditExport, SNAPSHOT_TIMESHEET_HEADERS, Snapshot, SnapshotTimesheet,
    TIMESHEET_HEADERS, TIMESHEETS_SECTION, TimesheetExport, USER_HEADERS, USERS_SECTION,
    UserExport, names_by_id,
};
use crate::models::role::Capability;
use crate::models::timesheet::Timesheet;
use crate::utils::path::require_absolute;
use chrono::Local;
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// What to export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Users,
    Timesheets,
    Complete,
    Audit,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Users => "users",
            ExportKind::Timesheets => "timesheets",
            ExportKind::Complete => "complete",
            ExportKind::Audit => "audit",
        }
    }
}

/// Row filters. Timesheet bounds apply to the timesheets and complete
/// exports, audit filters to the audit export.
#[derive(Clone, Debug, Default)]
pub struct ExportFilter {
    pub timesheets: TimesheetFilter,
    pub audit: AuditFilter,
}

/// Entry point of every export.
pub struct ExportLogic;

impl ExportLogic {
    /// Write one export to `file` and return the number of data rows.
    ///
    /// The format is checked before anything else, so an unsupported format
    /// never leaves a file behind.
    pub fn export(
        conn: &Connection,
        ctx: &RequestContext,
        kind: ExportKind,
        format: &str,
        file: &Path,
        filter: &ExportFilter,
        force: bool,
    ) -> AppResult<usize> {
        let format: ExportFormat = format.parse()?;

        ctx.require(Capability::Export)?;
        require_absolute(file)?;
        ensure_writable(file, force)?;

        let (bytes, rows) = Self::render(conn, kind, format, filter)?;

        let label = match format {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        };
        write_output(&bytes, file, label)?;

        info!(
            kind = kind.as_str(),
            format = %format,
            rows,
            path = %file.display(),
            by = %ctx.username,
            "export written"
        );
        Ok(rows)
    }

    /// Export content without touching the filesystem.
    pub fn render(
        conn: &Connection,
        kind: ExportKind,
        format: ExportFormat,
        filter: &ExportFilter,
    ) -> AppResult<(Vec<u8>, usize)> {
        match kind {
            ExportKind::Users => {
                let users: Vec<UserExport> = list_users(conn)?.iter().map(UserExport::from).collect();
                let bytes = match format {
                    ExportFormat::Json => render_json(&users)?,
                    ExportFormat::Csv => render_csv(&[CsvSection {
                        title: None,
                        headers: &USER_HEADERS,
                        rows: users.iter().map(UserExport::to_row).collect(),
                    }])?,
                };
                Ok((bytes, users.len()))
            }

            ExportKind::Timesheets => {
                let names = names_by_id(&list_users(conn)?);
                let records: Vec<TimesheetExport> = load_timesheets(conn, &filter.timesheets)?
                    .iter()
                    .map(|ts| TimesheetExport::new(ts, &names))
                    .collect();
                let bytes = match format {
                    ExportFormat::Json => render_json(&records)?,
                    ExportFormat::Csv => render_csv(&[CsvSection {
                        title: None,
                        headers: &TIMESHEET_HEADERS,
                        rows: records.iter().map(TimesheetExport::to_row).collect(),
                    }])?,
                };
                Ok((bytes, records.len()))
            }

            ExportKind::Complete => {
                let all_users = list_users(conn)?;
                let names = names_by_id(&all_users);
                let users: Vec<UserExport> = all_users.iter().map(UserExport::from).collect();
                let timesheets: Vec<SnapshotTimesheet> = load_timesheets(conn, &filter.timesheets)?
                    .iter()
                    .map(|ts| SnapshotTimesheet::new(ts, &names))
                    .collect();
                let rows = users.len() + timesheets.len();

                let bytes = match format {
                    ExportFormat::Json => render_json(&Snapshot {
                        export_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                        users,
                        timesheets,
                    })?,
                    ExportFormat::Csv => render_csv(&[
                        CsvSection {
                            title: Some(USERS_SECTION),
                            headers: &USER_HEADERS,
                            rows: users.iter().map(UserExport::to_row).collect(),
                        },
                        CsvSection {
                            title: Some(TIMESHEETS_SECTION),
                            headers: &SNAPSHOT_TIMESHEET_HEADERS,
                            rows: timesheets.iter().map(SnapshotTimesheet::to_row).collect(),
                        },
                    ])?,
                };
                Ok((bytes, rows))
            }

            ExportKind::Audit => {
                let entries: Vec<AuditExport> =
                    query_entries(conn, &filter.audit, AuditOrder::OldestFirst)?
                        .iter()
                        .map(AuditExport::from)
                        .collect();
                let bytes = match format {
                    ExportFormat::Json => render_json(&entries)?,
                    ExportFormat::Csv => render_csv(&[CsvSection {
                        title: None,
                        headers: &AUDIT_HEADERS,
                        rows: entries.iter().map(AuditExport::to_row).collect(),
                    }])?,
                };
                Ok((bytes, entries.len()))
            }
        }
    }
}

/// Records in id order.
fn load_timesheets(conn: &Connection, filter: &TimesheetFilter) -> AppResult<Vec<Timesheet>> {
    let mut records = query_timesheets(conn, filter)?;
    records.sort_by_key(|t| t.id);
    Ok(records)
}
