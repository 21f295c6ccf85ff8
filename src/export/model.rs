// src/export/model.rs

use crate::core::calculator::hours::format_hours;
use crate::models::audit::AuditEntry;
use crate::models::timesheet::Timesheet;
use crate::models::user::User;
use serde::Serialize;
use std::collections::HashMap;

pub(crate) const USER_HEADERS: [&str; 6] = ["ID", "Nom d'utilisateur", "Email", "Prénom", "Nom", "Rôle"];

pub(crate) const TIMESHEET_HEADERS: [&str; 8] = [
    "ID",
    "Utilisateur",
    "Date",
    "Début",
    "Fin",
    "Pause",
    "Heures",
    "Statut",
];

pub(crate) const SNAPSHOT_TIMESHEET_HEADERS: [&str; 9] = [
    "ID",
    "Utilisateur ID",
    "Nom utilisateur",
    "Date",
    "Début",
    "Fin",
    "Pause",
    "Heures",
    "Statut",
];

pub(crate) const AUDIT_HEADERS: [&str; 9] = [
    "ID",
    "Date/Heure",
    "Utilisateur",
    "Action",
    "Ressource",
    "ID Ressource",
    "Adresse IP",
    "Agent utilisateur",
    "Détails",
];

pub(crate) const USERS_SECTION: &str = "--- UTILISATEURS ---";
pub(crate) const TIMESHEETS_SECTION: &str = "--- FEUILLES DE TEMPS ---";

/// Display names by user id, used to label timesheet rows.
pub(crate) fn names_by_id(users: &[User]) -> HashMap<i64, String> {
    users.iter().map(|u| (u.id, u.full_name())).collect()
}

#[derive(Serialize, Clone, Debug)]
pub struct UserExport {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&User> for UserExport {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role.as_str().to_string(),
        }
    }
}

impl UserExport {
    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.role.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct UserRef {
    pub id: i64,
    pub name: String,
}

/// One record of the timesheets export. Missing times are empty strings.
#[derive(Serialize, Clone, Debug)]
pub struct TimesheetExport {
    pub id: i64,
    pub user: UserRef,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub break_duration: i64,
    pub total_hours: String,
    pub status: String,
}

impl TimesheetExport {
    pub(crate) fn new(ts: &Timesheet, names: &HashMap<i64, String>) -> Self {
        Self {
            id: ts.id,
            user: UserRef {
                id: ts.user_id,
                name: names.get(&ts.user_id).cloned().unwrap_or_default(),
            },
            date: ts.date_str(),
            start_time: ts.start_str(),
            end_time: ts.end_str(),
            break_duration: ts.break_minutes,
            total_hours: format_hours(ts.total_hours()),
            status: ts.status.as_str().to_string(),
        }
    }

    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user.name.clone(),
            self.date.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.break_duration.to_string(),
            self.total_hours.clone(),
            self.status.clone(),
        ]
    }
}

/// Timesheet as it appears in the combined snapshot.
#[derive(Serialize, Clone, Debug)]
pub struct SnapshotTimesheet {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub break_duration: i64,
    pub total_hours: String,
    pub status: String,
    pub validator_id: Option<i64>,
}

impl SnapshotTimesheet {
    pub(crate) fn new(ts: &Timesheet, names: &HashMap<i64, String>) -> Self {
        Self {
            id: ts.id,
            user_id: ts.user_id,
            user_name: names.get(&ts.user_id).cloned().unwrap_or_default(),
            date: ts.date_str(),
            start_time: ts.start_str(),
            end_time: ts.end_str(),
            break_duration: ts.break_minutes,
            total_hours: format_hours(ts.total_hours()),
            status: ts.status.as_str().to_string(),
            validator_id: ts.validator_id,
        }
    }

    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user_id.to_string(),
            self.user_name.clone(),
            self.date.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.break_duration.to_string(),
            self.total_hours.clone(),
            self.status.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Snapshot {
    #[serde(rename = "exportDate")]
    pub export_date: String,
    pub users: Vec<UserExport>,
    pub timesheets: Vec<SnapshotTimesheet>,
}

#[derive(Serialize, Clone, Debug)]
pub struct AuditExport {
    pub id: i64,
    pub timestamp: String,
    pub username: String,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<String>,
}

impl From<&AuditEntry> for AuditExport {
    fn from(e: &AuditEntry) -> Self {
        Self {
            id: e.id,
            timestamp: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            username: e.username.clone().unwrap_or_else(|| "Anonymous".to_string()),
            action: e.action.as_str().to_string(),
            resource: e.resource.as_str().to_string(),
            resource_id: e.resource_id,
            ip_address: e.ip_address.clone(),
            user_agent: e.user_agent.clone(),
            details: e.details.clone(),
        }
    }
}

impl AuditExport {
    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.timestamp.clone(),
            self.username.clone(),
            self.action.clone(),
            self.resource.clone(),
            self.resource_id.map(|id| id.to_string()).unwrap_or_default(),
            self.ip_address.clone().unwrap_or_default(),
            self.user_agent.clone().unwrap_or_default(),
            self.details.clone().unwrap_or_default(),
        ]
    }
}
