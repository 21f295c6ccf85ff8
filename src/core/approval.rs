//! Manager decisions on submitted records.
//!
//! `submitted` → `approved` | `rejected`. A decided record only goes back to
//! `submitted` when its owner submits the day again.

use crate::core::audit::{self, AuditRecord};
use crate::core::calculator::hours::format_hours;
use crate::core::context::RequestContext;
use crate::db::timesheets::{TimesheetFilter, find_timesheet, query_timesheets, set_status};
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditResource};
use crate::models::role::Capability;
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn status(self) -> TimesheetStatus {
        match self {
            Decision::Approve => TimesheetStatus::Approved,
            Decision::Reject => TimesheetStatus::Rejected,
        }
    }

    fn action(self) -> AuditAction {
        match self {
            Decision::Approve => AuditAction::Approve,
            Decision::Reject => AuditAction::Reject,
        }
    }
}

/// Apply a decision to record `id` on behalf of the acting manager.
pub fn decide(
    conn: &Connection,
    ctx: &RequestContext,
    id: i64,
    decision: Decision,
) -> AppResult<Timesheet> {
    ctx.require(Capability::DecideTimesheet)?;

    let mut ts = find_timesheet(conn, id)?.ok_or(AppError::NotFound {
        resource: "timesheet",
        id,
    })?;

    if ts.status != TimesheetStatus::Submitted {
        return Err(AppError::forbidden(format!(
            "timesheet #{} is already {}",
            id, ts.status
        )));
    }

    // hours as they are at decision time
    let hours = ts.total_hours();

    let tx = conn.unchecked_transaction()?;

    set_status(&tx, id, decision.status(), Some(ctx.user_id))?;

    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(decision.action(), AuditResource::Timesheet)
            .resource_id(id)
            .details(json!({
                "user_id": ts.user_id,
                "date": ts.date_str(),
                "hours": format_hours(hours),
            })),
    )?;

    tx.commit()?;

    ts.status = decision.status();
    ts.validator_id = Some(ctx.user_id);

    info!(
        id,
        manager = %ctx.username,
        status = %ts.status,
        hours,
        "timesheet decided"
    );

    Ok(ts)
}

pub fn approve(conn: &Connection, ctx: &RequestContext, id: i64) -> AppResult<Timesheet> {
    decide(conn, ctx, id, Decision::Approve)
}

pub fn reject(conn: &Connection, ctx: &RequestContext, id: i64) -> AppResult<Timesheet> {
    decide(conn, ctx, id, Decision::Reject)
}

/// Records waiting for a decision, most recent date first.
pub fn pending(conn: &Connection, ctx: &RequestContext) -> AppResult<Vec<Timesheet>> {
    ctx.require(Capability::DecideTimesheet)?;

    query_timesheets(
        conn,
        &TimesheetFilter {
            status: Some(TimesheetStatus::Submitted),
            ..Default::default()
        },
    )
}
