use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Verb recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
    LoginSuccess,
    LoginFailed,
    Logout,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Approve => "approve",
            AuditAction::Reject => "reject",
            AuditAction::LoginSuccess => "login_success",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::Logout => "logout",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "create" => Some(AuditAction::Create),
            "update" => Some(AuditAction::Update),
            "delete" => Some(AuditAction::Delete),
            "approve" => Some(AuditAction::Approve),
            "reject" => Some(AuditAction::Reject),
            "login_success" => Some(AuditAction::LoginSuccess),
            "login_failed" => Some(AuditAction::LoginFailed),
            "logout" => Some(AuditAction::Logout),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResource {
    Auth,
    User,
    Timesheet,
    Code,
    Modifier,
}

impl AuditResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditResource::Auth => "auth",
            AuditResource::User => "user",
            AuditResource::Timesheet => "timesheet",
            AuditResource::Code => "code",
            AuditResource::Modifier => "modifier",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "auth" => Some(AuditResource::Auth),
            "user" => Some(AuditResource::User),
            "timesheet" => Some(AuditResource::Timesheet),
            "code" => Some(AuditResource::Code),
            "modifier" => Some(AuditResource::Modifier),
            _ => None,
        }
    }
}

impl fmt::Display for AuditResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable row of the `audit_log` table.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action: AuditAction,
    pub resource: AuditResource,
    pub resource_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<String>,
}

impl AuditEntry {
    /// Parsed JSON payload, when the details were stored as JSON.
    pub fn details_json(&self) -> Option<serde_json::Value> {
        self.details
            .as_deref()
            .and_then(|d| serde_json::from_str(d).ok())
    }
}
