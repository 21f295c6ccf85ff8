use crate::core::audit::{self, AuditRecord};
use crate::core::context::RequestContext;
use crate::core::input::check_offset;
use crate::db::catalog as catalog_db;
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditResource};
use crate::models::catalog::{Code, Modifier};
use crate::models::role::Capability;
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::validation("name must be 1 to 64 characters"));
    }
    Ok(name.to_string())
}

pub fn add_code(conn: &Connection, ctx: &RequestContext, name: &str) -> AppResult<Code> {
    ctx.require(Capability::ManageCatalog)?;
    let name = clean_name(name)?;

    if catalog_db::find_code_by_name(conn, &name)?.is_some() {
        return Err(AppError::validation(format!("code '{}' already exists", name)));
    }

    let tx = conn.unchecked_transaction()?;
    let id = catalog_db::insert_code(&tx, &name)?;
    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Create, AuditResource::Code)
            .resource_id(id)
            .details(json!({ "name": name })),
    )?;
    tx.commit()?;

    info!(id, name = %name, "code created");
    Ok(Code { id, name })
}

pub fn add_modifier(
    conn: &Connection,
    ctx: &RequestContext,
    name: &str,
    minutes: i64,
) -> AppResult<Modifier> {
    ctx.require(Capability::ManageCatalog)?;
    let name = clean_name(name)?;
    check_offset(minutes)?;

    if catalog_db::find_modifier_by_name(conn, &name)?.is_some() {
        return Err(AppError::validation(format!("modifier '{}' already exists", name)));
    }

    let tx = conn.unchecked_transaction()?;
    let id = catalog_db::insert_modifier(&tx, &name, Some(minutes))?;
    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Create, AuditResource::Modifier)
            .resource_id(id)
            .details(json!({ "name": name, "minutes": minutes })),
    )?;
    tx.commit()?;

    info!(id, name = %name, minutes, "modifier created");
    Ok(Modifier {
        id,
        name,
        minutes: Some(minutes),
    })
}

/// Change a modifier's offset. The hours of every record carrying it change
/// with it, decided ones included.
pub fn set_modifier_minutes(
    conn: &Connection,
    ctx: &RequestContext,
    name: &str,
    minutes: Option<i64>,
) -> AppResult<Modifier> {
    ctx.require(Capability::ManageCatalog)?;
    if let Some(m) = minutes {
        check_offset(m)?;
    }

    let mut modifier = catalog_db::find_modifier_by_name(conn, name)?
        .ok_or_else(|| AppError::validation(format!("unknown modifier '{}'", name)))?;
    let old = modifier.minutes;

    let tx = conn.unchecked_transaction()?;
    catalog_db::update_modifier_minutes(&tx, modifier.id, minutes)?;
    audit::record(
        &tx,
        Some(ctx),
        AuditRecord::new(AuditAction::Update, AuditResource::Modifier)
            .resource_id(modifier.id)
            .details(json!({
                "name": modifier.name,
                "old": { "minutes": old },
                "new": { "minutes": minutes },
            })),
    )?;
    tx.commit()?;

    modifier.minutes = minutes;
    info!(id = modifier.id, ?old, ?minutes, "modifier offset changed");
    Ok(modifier)
}

pub fn list_codes(conn: &Connection) -> AppResult<Vec<Code>> {
    catalog_db::list_codes(conn)
}

pub fn list_modifiers(conn: &Connection) -> AppResult<Vec<Modifier>> {
    catalog_db::list_modifiers(conn)
}
