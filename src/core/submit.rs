//! Timesheet record store: period submission, direct edits and queries.

use crate::core::audit::{self, AuditRecord};
use crate::core::calculator::hours::format_hours;
use crate::core::calculator::totals::sum_hours;
use crate::core::context::RequestContext;
use crate::core::input::{DayEntry, RecordEdit};
use crate::core::period::Period;
use crate::db::catalog::{find_code_by_name, find_modifier_by_name};
use crate::db::timesheets::{
    TimesheetFilter, find_by_user_and_date, find_timesheet, insert_timesheet, query_timesheets,
    replace_modifiers, update_timesheet,
};
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditResource};
use crate::models::catalog::{Code, Modifier};
use crate::models::role::Capability;
use crate::models::timesheet::{Timesheet, TimesheetStatus};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Outcome of a period submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub records: Vec<Timesheet>,
    /// Days left out because start, end or code was missing.
    pub skipped: usize,
}

fn resolve_code(conn: &Connection, name: &str) -> AppResult<Code> {
    find_code_by_name(conn, name)?
        .ok_or_else(|| AppError::validation(format!("unknown code '{}'", name)))
}

fn resolve_modifiers(conn: &Connection, names: &[String]) -> AppResult<Vec<Modifier>> {
    let mut out: Vec<Modifier> = Vec::with_capacity(names.len());
    for name in names {
        let m = find_modifier_by_name(conn, name)?
            .ok_or_else(|| AppError::validation(format!("unknown modifier '{}'", name)))?;
        if !out.iter().any(|known| known.id == m.id) {
            out.push(m);
        }
    }
    Ok(out)
}

/// Record state as stored in audit payloads.
fn snapshot(ts: &Timesheet) -> Value {
    json!({
        "date": ts.date_str(),
        "start_time": ts.start_str(),
        "end_time": ts.end_str(),
        "break_duration": ts.break_minutes,
        "code": ts.code_name(),
        "modifiers": ts.modifiers.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        "hours": format_hours(ts.total_hours()),
    })
}

/// Store one complete day for the acting user.
///
/// The (user, date) record is created when absent and updated in place
/// otherwise. Either way it goes back to `submitted` with no validator, so
/// re-submitting a decided day reopens it.
pub fn upsert_day(conn: &Connection, ctx: &RequestContext, entry: &DayEntry) -> AppResult<Timesheet> {
    let code_name = match (&entry.start, &entry.end, &entry.code) {
        (Some(_), Some(_), Some(code)) => code,
        _ => {
            return Err(AppError::validation(format!(
                "day {} needs a start time, an end time and a code",
                entry.date
            )));
        }
    };

    let code = resolve_code(conn, code_name)?;
    let modifiers = resolve_modifiers(conn, &entry.modifiers)?;
    let modifier_ids: Vec<i64> = modifiers.iter().map(|m| m.id).collect();

    let tx = conn.unchecked_transaction()?;

    let ts = match find_by_user_and_date(&tx, ctx.user_id, entry.date)? {
        Some(mut ts) => {
            let old = snapshot(&ts);

            ts.start_time = entry.start;
            ts.end_time = entry.end;
            ts.break_minutes = entry.break_minutes.unwrap_or(0);
            ts.code = Some(code);
            if entry.description.is_some() {
                ts.description = entry.description.clone();
            }
            ts.status = TimesheetStatus::Submitted;
            ts.validator_id = None;
            ts.modifiers = modifiers;

            update_timesheet(&tx, &ts)?;
            replace_modifiers(&tx, ts.id, &modifier_ids)?;

            audit::record(
                &tx,
                Some(ctx),
                AuditRecord::new(AuditAction::Update, AuditResource::Timesheet)
                    .resource_id(ts.id)
                    .details(json!({ "old": old, "new": snapshot(&ts) })),
            )?;

            debug!(id = ts.id, date = %ts.date, "timesheet updated");
            ts
        }
        None => {
            let mut ts = Timesheet {
                id: 0,
                user_id: ctx.user_id,
                date: entry.date,
                start_time: entry.start,
                end_time: entry.end,
                break_minutes: entry.break_minutes.unwrap_or(0),
                description: entry.description.clone(),
                status: TimesheetStatus::Submitted,
                code: Some(code),
                validator_id: None,
                modifiers,
            };

            ts.id = insert_timesheet(&tx, &ts)?;
            replace_modifiers(&tx, ts.id, &modifier_ids)?;

            audit::record(
                &tx,
                Some(ctx),
                AuditRecord::new(AuditAction::Create, AuditResource::Timesheet)
                    .resource_id(ts.id)
                    .details(json!({
                        "date": ts.date_str(),
                        "hours": format_hours(ts.total_hours()),
                    })),
            )?;

            debug!(id = ts.id, date = %ts.date, "timesheet created");
            ts
        }
    };

    tx.commit()?;
    Ok(ts)
}

/// Submit the filled-in days of a period for the acting employee.
///
/// The whole batch is checked before anything is written: a day outside the
/// period refuses the batch, and so does an unknown code or modifier on a
/// complete day. Days missing start, end or code are skipped. Each stored
/// day commits on its own.
pub fn submit_period(
    conn: &Connection,
    ctx: &RequestContext,
    period: &Period,
    entries: &[DayEntry],
    today: NaiveDate,
) -> AppResult<Submission> {
    ctx.require(Capability::SubmitTimesheet)?;

    if period.is_read_only(today) {
        return Err(AppError::forbidden(format!(
            "{} is closed for submission",
            period
        )));
    }

    for e in entries {
        if !period.contains(e.date) {
            return Err(AppError::validation(format!(
                "{} is outside {}",
                e.date, period
            )));
        }
        // skipped below, so their names are never looked up
        if !e.is_complete() {
            continue;
        }
        if let Some(code) = &e.code {
            resolve_code(conn, code)?;
        }
        resolve_modifiers(conn, &e.modifiers)?;
    }

    let mut records = Vec::new();
    let mut skipped = 0;

    for e in entries {
        if !e.is_complete() {
            skipped += 1;
            continue;
        }
        records.push(upsert_day(conn, ctx, e)?);
    }

    info!(
        user = %ctx.username,
        period = period.number,
        year = period.year,
        stored = records.len(),
        skipped,
        "period submitted"
    );

    Ok(Submission { records, skipped })
}

/// Change an existing record by id. Only its owner may do so, and only
/// while it is still `submitted`.
pub fn edit_record(
    conn: &Connection,
    ctx: &RequestContext,
    id: i64,
    edit: &RecordEdit,
) -> AppResult<Timesheet> {
    ctx.require(Capability::SubmitTimesheet)?;
    edit.validate()?;

    let mut ts = find_timesheet(conn, id)?.ok_or(AppError::NotFound {
        resource: "timesheet",
        id,
    })?;

    if ts.user_id != ctx.user_id {
        return Err(AppError::forbidden(format!(
            "timesheet #{} belongs to another user",
            id
        )));
    }
    if ts.status.is_decided() {
        return Err(AppError::forbidden(format!(
            "timesheet #{} is already {}",
            id, ts.status
        )));
    }

    let code = edit
        .code
        .as_deref()
        .map(|name| resolve_code(conn, name))
        .transpose()?;
    let modifiers = edit
        .modifiers
        .as_deref()
        .map(|names| resolve_modifiers(conn, names))
        .transpose()?;

    let old = snapshot(&ts);

    if let Some(start) = edit.start {
        ts.start_time = Some(start);
    }
    if let Some(end) = edit.end {
        ts.end_time = Some(end);
    }
    if let Some(b) = edit.break_minutes {
        ts.break_minutes = b;
    }
    if let Some(code) = code {
        ts.code = Some(code);
    }
    if let Some(desc) = &edit.description {
        ts.description = Some(desc.clone());
    }

    let tx = conn.unchecked_transaction()?;

    update_timesheet(&tx, &ts)?;
    if let Some(mods) = modifiers {
        let ids: Vec<i64> = mods.iter().map(|m| m.id).collect();
        replace_modifiers(&tx, ts.id, &ids)?;
        ts.modifiers = mods;
    }

    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Update, AuditResource::Timesheet)
            .resource_id(ts.id)
            .details(json!({ "old": old, "new": snapshot(&ts) })),
    )?;

    tx.commit()?;

    info!(id = ts.id, user = %ctx.username, "timesheet edited");
    Ok(ts)
}

/// Records visible to the acting user, most recent date first.
///
/// Employees only ever see their own records; asking for someone else's is
/// refused.
pub fn list_records(
    conn: &Connection,
    ctx: &RequestContext,
    filter: &TimesheetFilter,
) -> AppResult<Vec<Timesheet>> {
    let mut filter = filter.clone();

    if !ctx.can(Capability::ViewAllTimesheets) {
        match filter.user_id {
            Some(uid) if uid != ctx.user_id => {
                return Err(AppError::forbidden("you can only list your own timesheets"));
            }
            _ => filter.user_id = Some(ctx.user_id),
        }
    }

    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(AppError::validation(format!(
            "date range start {} is after its end {}",
            from, to
        )));
    }

    query_timesheets(conn, &filter)
}

// ---------------------------------------------------------------------------
// Period view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub record: Option<Timesheet>,
    pub hours: f64,
}

/// One period of the acting user's records, as shown on the entry screen.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodOverview {
    pub period: Period,
    pub read_only: bool,
    pub previous: u32,
    pub next: u32,
    pub days: Vec<DayView>,
    pub week_totals: [f64; 2],
    pub total: f64,
}

pub fn period_overview(
    conn: &Connection,
    ctx: &RequestContext,
    period: &Period,
    today: NaiveDate,
) -> AppResult<PeriodOverview> {
    let records = query_timesheets(
        conn,
        &TimesheetFilter {
            user_id: Some(ctx.user_id),
            from: Some(period.start()),
            to: Some(period.end()),
            status: None,
        },
    )?;

    let days: Vec<DayView> = period
        .dates()
        .iter()
        .map(|d| {
            let record = records.iter().find(|r| r.date == *d).cloned();
            let hours = record.as_ref().map(Timesheet::total_hours).unwrap_or(0.0);
            DayView {
                date: *d,
                record,
                hours,
            }
        })
        .collect();

    let week_total = |w: usize| -> f64 {
        sum_hours(
            days[w * 7..(w + 1) * 7]
                .iter()
                .filter_map(|d| d.record.as_ref()),
        )
    };
    let week_totals = [week_total(0), week_total(1)];

    Ok(PeriodOverview {
        period: *period,
        read_only: period.is_read_only(today),
        previous: period.previous()?.number,
        next: period.next()?.number,
        total: week_totals[0] + week_totals[1],
        week_totals,
        days,
    })
}
