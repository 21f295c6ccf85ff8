//! User administration and first-run seeding.

use crate::core::audit::{self, AuditRecord};
use crate::core::auth::hash_password;
use crate::core::context::{RequestContext, RequestSource};
use crate::core::input::{NewUser, UserUpdate};
use crate::db::catalog::{find_code_by_name, find_modifier_by_name, insert_code, insert_modifier};
use crate::db::timesheets::{clear_validator, delete_owned_by};
use crate::db::users::{self as user_db, find_user, find_user_by_email, find_user_by_username};
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditResource};
use crate::models::role::{Capability, Role};
use crate::models::user::User;
use rusqlite::Connection;
use serde_json::{Value, json};
use tracing::{debug, info};

fn ensure_unique(conn: &Connection, username: &str, email: &str, except: Option<i64>) -> AppResult<()> {
    if let Some(u) = find_user_by_username(conn, username)?
        && Some(u.id) != except
    {
        return Err(AppError::validation(format!(
            "username '{}' is already taken",
            username
        )));
    }
    if let Some(u) = find_user_by_email(conn, email)?
        && Some(u.id) != except
    {
        return Err(AppError::validation(format!(
            "e-mail '{}' is already in use",
            email
        )));
    }
    Ok(())
}

fn profile(u: &User) -> Value {
    json!({
        "username": u.username,
        "email": u.email,
        "first_name": u.first_name,
        "last_name": u.last_name,
        "role": u.role.as_str(),
        "employee_type": u.employee_type,
    })
}

/// Create an account. Admins may create any role; managers only employees.
pub fn create_user(conn: &Connection, ctx: &RequestContext, new: &NewUser) -> AppResult<User> {
    if !ctx.can(Capability::ManageUsers) {
        ctx.require(Capability::CreateEmployee)?;
        if new.role != Role::Employee {
            return Err(AppError::forbidden(format!(
                "role '{}' can only create employee accounts",
                ctx.role
            )));
        }
    }

    new.validate()?;
    ensure_unique(conn, &new.username, &new.email, None)?;

    let mut user = User {
        id: 0,
        username: new.username.clone(),
        email: new.email.clone(),
        password_hash: hash_password(&new.password)?,
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        role: new.role,
        employee_type: new.employee_type.clone(),
    };

    let tx = conn.unchecked_transaction()?;

    user.id = user_db::insert_user(&tx, &user)?;

    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Create, AuditResource::User)
            .resource_id(user.id)
            .details(json!({
                "username": user.username,
                "email": user.email,
                "role": user.role.as_str(),
            })),
    )?;

    tx.commit()?;

    info!(id = user.id, username = %user.username, role = %user.role, by = %ctx.username, "user created");
    Ok(user)
}

/// Edit an account.
///
/// Other admins cannot be edited. An admin editing their own account keeps
/// their role whatever is requested.
pub fn update_user(
    conn: &Connection,
    ctx: &RequestContext,
    id: i64,
    update: &UserUpdate,
) -> AppResult<User> {
    ctx.require(Capability::ManageUsers)?;
    update.validate()?;

    let mut user = find_user(conn, id)?.ok_or(AppError::NotFound { resource: "user", id })?;

    if user.role == Role::Admin && user.id != ctx.user_id {
        return Err(AppError::forbidden("another administrator's account cannot be edited"));
    }

    let old = profile(&user);

    if let Some(u) = &update.username {
        user.username = u.clone();
    }
    if let Some(e) = &update.email {
        user.email = e.clone();
    }
    if let Some(f) = &update.first_name {
        user.first_name = f.trim().to_string();
    }
    if let Some(l) = &update.last_name {
        user.last_name = l.trim().to_string();
    }
    if let Some(t) = &update.employee_type {
        user.employee_type = Some(t.clone());
    }
    if let Some(role) = update.role {
        if user.id == ctx.user_id {
            debug!(id, "own role change ignored");
        } else {
            user.role = role;
        }
    }
    let password_changed = match &update.password {
        Some(p) => {
            user.password_hash = hash_password(p)?;
            true
        }
        None => false,
    };

    ensure_unique(conn, &user.username, &user.email, Some(user.id))?;

    let mut new = profile(&user);
    new["password_changed"] = json!(password_changed);

    let tx = conn.unchecked_transaction()?;

    user_db::update_user(&tx, &user)?;

    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Update, AuditResource::User)
            .resource_id(user.id)
            .details(json!({ "old": old, "new": new })),
    )?;

    tx.commit()?;

    info!(id = user.id, username = %user.username, by = %ctx.username, "user updated");
    Ok(user)
}

/// Delete an account and the timesheets it owns.
///
/// Records the user decided on as a manager are kept, with their validator
/// cleared. Nobody can delete themselves or an administrator.
pub fn delete_user(conn: &Connection, ctx: &RequestContext, id: i64) -> AppResult<User> {
    ctx.require(Capability::ManageUsers)?;

    if id == ctx.user_id {
        return Err(AppError::forbidden("you cannot delete your own account"));
    }

    let user = find_user(conn, id)?.ok_or(AppError::NotFound { resource: "user", id })?;

    if user.role == Role::Admin {
        let admins = user_db::count_by_role(conn, Role::Admin)?;
        return Err(AppError::forbidden(if admins <= 1 {
            "the last administrator cannot be deleted"
        } else {
            "another administrator cannot be deleted"
        }));
    }

    let tx = conn.unchecked_transaction()?;

    let removed = delete_owned_by(&tx, id)?;
    let released = clear_validator(&tx, id)?;
    user_db::delete_user(&tx, id)?;

    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Delete, AuditResource::User)
            .resource_id(id)
            .details(json!({
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "role": user.role.as_str(),
            })),
    )?;

    tx.commit()?;

    info!(
        id,
        username = %user.username,
        timesheets_removed = removed,
        decisions_released = released,
        by = %ctx.username,
        "user deleted"
    );
    Ok(user)
}

/// All accounts, or employees only for a manager.
pub fn list_users(conn: &Connection, ctx: &RequestContext) -> AppResult<Vec<User>> {
    if ctx.can(Capability::ManageUsers) {
        return user_db::list_users(conn);
    }
    ctx.require(Capability::CreateEmployee)?;
    user_db::list_users_by_role(conn, Role::Employee)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub const SEED_PASSWORD: &str = "password";

/// (username, email, role, first name, last name)
const SEED_USERS: [(&str, &str, Role, &str, &str); 3] = [
    ("employe", "employe@example.com", Role::Employee, "Test", "Employee"),
    ("gestionnaire", "gestionnaire@example.com", Role::Manager, "Admin", "Manager"),
    ("admin", "admin@example.com", Role::Admin, "Super", "Admin"),
];

const SEED_CODES: [&str; 4] = ["Presence", "Vacation", "Sick leave", "Holiday"];

const SEED_MODIFIERS: [(&str, i64); 1] = [("Meal", -30)];

/// What `seed` actually inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: Vec<String>,
    pub codes: Vec<String>,
    pub modifiers: Vec<String>,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.codes.is_empty() && self.modifiers.is_empty()
    }
}

/// Insert the default accounts and catalog entries. Existing names are
/// left untouched.
pub fn seed(conn: &Connection, source: RequestSource) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();
    let tx = conn.unchecked_transaction()?;

    for (username, email, role, first, last) in SEED_USERS {
        if find_user_by_username(&tx, username)?.is_some() {
            debug!(username, "seed: user exists, skipped");
            continue;
        }

        let user = User {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(SEED_PASSWORD)?,
            first_name: first.to_string(),
            last_name: last.to_string(),
            role,
            employee_type: (role == Role::Employee).then(|| "regulier".to_string()),
        };
        let id = user_db::insert_user(&tx, &user)?;

        audit::record(
            &tx,
            None,
            AuditRecord::new(AuditAction::Create, AuditResource::User)
                .resource_id(id)
                .details(json!({ "username": username, "email": email, "role": role.as_str() }))
                .source(source.clone()),
        )?;
        report.users.push(username.to_string());
    }

    for name in SEED_CODES {
        if find_code_by_name(&tx, name)?.is_some() {
            continue;
        }
        let id = insert_code(&tx, name)?;
        audit::record(
            &tx,
            None,
            AuditRecord::new(AuditAction::Create, AuditResource::Code)
                .resource_id(id)
                .details(json!({ "name": name }))
                .source(source.clone()),
        )?;
        report.codes.push(name.to_string());
    }

    for (name, minutes) in SEED_MODIFIERS {
        if find_modifier_by_name(&tx, name)?.is_some() {
            continue;
        }
        let id = insert_modifier(&tx, name, Some(minutes))?;
        audit::record(
            &tx,
            None,
            AuditRecord::new(AuditAction::Create, AuditResource::Modifier)
                .resource_id(id)
                .details(json!({ "name": name, "minutes": minutes }))
                .source(source.clone()),
        )?;
        report.modifiers.push(name.to_string());
    }

    tx.commit()?;

    info!(
        users = report.users.len(),
        codes = report.codes.len(),
        modifiers = report.modifiers.len(),
        "seed completed"
    );
    Ok(report)
}
