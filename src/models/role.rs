use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

/// What a role is allowed to do. Checked through `Role::can`, never by
/// comparing role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SubmitTimesheet,
    DecideTimesheet,
    ViewAllTimesheets,
    ViewReports,
    CreateEmployee,
    ManageUsers,
    ManageCatalog,
    Export,
    ViewAudit,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(Role::Employee),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn can(&self, cap: Capability) -> bool {
        use Capability::*;

        match self {
            Role::Employee => matches!(cap, SubmitTimesheet),
            Role::Manager => matches!(
                cap,
                DecideTimesheet | ViewAllTimesheets | ViewReports | CreateEmployee
            ),
            Role::Admin => matches!(
                cap,
                ViewAllTimesheets
                    | ViewReports
                    | CreateEmployee
                    | ManageUsers
                    | ManageCatalog
                    | Export
                    | ViewAudit
            ),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_db_str(&s.trim().to_lowercase()).ok_or_else(|| {
            AppError::validation(format!(
                "unknown role '{s}' (expected employee, manager or admin)"
            ))
        })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::SubmitTimesheet => "submit timesheets",
            Capability::DecideTimesheet => "approve or reject timesheets",
            Capability::ViewAllTimesheets => "view other users' timesheets",
            Capability::ViewReports => "view reports",
            Capability::CreateEmployee => "create employees",
            Capability::ManageUsers => "manage users",
            Capability::ManageCatalog => "manage codes and modifiers",
            Capability::Export => "export data",
            Capability::ViewAudit => "view the audit log",
        };
        f.write_str(label)
    }
}
