//! Password hashing and login/logout.
//!
//! Passwords are stored as Argon2id PHC strings.

use crate::core::audit::{self, AuditRecord};
use crate::core::context::{RequestContext, RequestSource};
use crate::db::users::find_user_by_username;
use crate::errors::{AppError, AppResult};
use crate::models::audit::{AuditAction, AuditResource};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rusqlite::Connection;
use serde_json::json;
use tracing::{info, warn};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// `Ok(false)` on mismatch; an unparseable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::PasswordHash(format!("invalid stored hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Check credentials and open a request context for the user.
///
/// Both outcomes are audited. A failed attempt records the username as typed
/// and never says which of the two fields was wrong.
pub fn login(
    conn: &Connection,
    username: &str,
    password: &str,
    source: RequestSource,
) -> AppResult<RequestContext> {
    let user = find_user_by_username(conn, username)?;

    let verified = match &user {
        Some(u) => verify_password(password, &u.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        audit::record(
            conn,
            None,
            AuditRecord::new(AuditAction::LoginFailed, AuditResource::Auth)
                .username(username)
                .details(json!({ "reason": "Invalid username or password" }))
                .source(source),
        )?;
        warn!(username, "login failed");
        return Err(AppError::InvalidCredentials);
    };

    let ctx = RequestContext::new(user.id, &user.username, user.role, source);

    audit::record(
        conn,
        Some(&ctx),
        AuditRecord::new(AuditAction::LoginSuccess, AuditResource::Auth)
            .resource_id(user.id)
            .username(user.username.as_str()),
    )?;

    info!(username = %user.username, role = %user.role, "login");
    Ok(ctx)
}

pub fn logout(conn: &Connection, ctx: &RequestContext) -> AppResult<()> {
    audit::record(
        conn,
        Some(ctx),
        AuditRecord::new(AuditAction::Logout, AuditResource::Auth)
            .resource_id(ctx.user_id)
            .username(ctx.username.as_str()),
    )?;

    info!(username = %ctx.username, "logout");
    Ok(())
}
