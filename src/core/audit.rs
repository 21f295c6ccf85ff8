//! Audit log sink.
//!
//! Every state-changing operation calls [`record`] with the same connection
//! (usually an open transaction) it used for the mutation. The entry is
//! therefore committed or rolled back together with the change it describes:
//! a failed audit write fails the whole operation.

use crate::core::context::{RequestContext, RequestSource};
use crate::db::audit_log::{self, AuditFilter, AuditOrder};
use crate::db::users::username_of;
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditEntry, AuditResource};
use crate::models::role::Capability;
use chrono::Utc;
use rusqlite::Connection;
use serde_json::Value;
use tracing::{debug, warn};

/// Free-form payload attached to an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditDetails {
    Json(Value),
    Text(String),
}

impl AuditDetails {
    /// Textual form stored in the `details` column.
    pub fn to_stored(&self) -> String {
        match self {
            AuditDetails::Json(v) => v.to_string(),
            AuditDetails::Text(s) => s.clone(),
        }
    }
}

impl From<Value> for AuditDetails {
    fn from(v: Value) -> Self {
        AuditDetails::Json(v)
    }
}

impl From<String> for AuditDetails {
    fn from(s: String) -> Self {
        AuditDetails::Text(s)
    }
}

impl From<&str> for AuditDetails {
    fn from(s: &str) -> Self {
        AuditDetails::Text(s.to_string())
    }
}

/// What to record. Unset identity fields are filled from the request
/// context by [`record`].
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub action: AuditAction,
    pub resource: AuditResource,
    pub resource_id: Option<i64>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub details: Option<AuditDetails>,
    pub source: Option<RequestSource>,
}

impl AuditRecord {
    pub fn new(action: AuditAction, resource: AuditResource) -> Self {
        Self {
            action,
            resource,
            resource_id: None,
            user_id: None,
            username: None,
            details: None,
            source: None,
        }
    }

    pub fn resource_id(mut self, id: i64) -> Self {
        self.resource_id = Some(id);
        self
    }

    pub fn user_id(mut self, id: i64) -> Self {
        self.user_id = Some(id);
        self
    }

    pub fn username<S: Into<String>>(mut self, name: S) -> Self {
        self.username = Some(name.into());
        self
    }

    pub fn details<D: Into<AuditDetails>>(mut self, details: D) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Request origin when there is no context yet (failed logins).
    pub fn source(mut self, source: RequestSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// Append one entry to the audit log.
///
/// - `user_id` defaults to the acting user of `ctx`
/// - a missing `username` is looked up from `user_id`; a failed lookup
///   leaves it empty and never fails the write
/// - timestamps never go backwards relative to the last stored entry
pub fn record(
    conn: &Connection,
    ctx: Option<&RequestContext>,
    rec: AuditRecord,
) -> AppResult<AuditEntry> {
    let user_id = rec.user_id.or(ctx.map(|c| c.user_id));

    let username = match (rec.username, user_id) {
        (Some(name), _) => Some(name),
        (None, Some(uid)) => match username_of(conn, uid) {
            Ok(found) => found,
            Err(e) => {
                warn!(user_id = uid, error = %e, "audit: username lookup failed");
                None
            }
        },
        (None, None) => None,
    };

    let source = rec.source.or_else(|| ctx.map(|c| c.source.clone()));

    let now = Utc::now();
    let timestamp = match audit_log::last_timestamp(conn)? {
        Some(last) if last > now => last,
        _ => now,
    };

    let mut entry = AuditEntry {
        id: 0,
        timestamp,
        user_id,
        username,
        action: rec.action,
        resource: rec.resource,
        resource_id: rec.resource_id,
        ip_address: source.as_ref().and_then(|s| s.address.clone()),
        user_agent: source.as_ref().and_then(|s| s.client.clone()),
        details: rec.details.as_ref().map(AuditDetails::to_stored),
    };

    entry.id = audit_log::insert_entry(conn, &entry)?;

    debug!(
        id = entry.id,
        action = %entry.action,
        resource = %entry.resource,
        resource_id = ?entry.resource_id,
        "audit entry recorded"
    );

    Ok(entry)
}

/// Entries matching `filter`, for administrators only.
pub fn list_entries(
    conn: &Connection,
    ctx: &RequestContext,
    filter: &AuditFilter,
    order: AuditOrder,
) -> AppResult<Vec<AuditEntry>> {
    ctx.require(Capability::ViewAudit)?;
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(AppError::validation(format!(
            "date range start {} is after its end {}",
            from, to
        )));
    }
    audit_log::query_entries(conn, filter, order)
}

/// Actions present in the log, offered as `--action` values.
pub fn known_actions(conn: &Connection, ctx: &RequestContext) -> AppResult<Vec<String>> {
    ctx.require(Capability::ViewAudit)?;
    audit_log::distinct_actions(conn)
}
