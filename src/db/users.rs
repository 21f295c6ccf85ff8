use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, role, employee_type";

pub fn map_user(row: &Row) -> Result<User> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::validation(format!("invalid role: {}", role_str))),
        )
    })?;

    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        role,
        employee_type: row.get("employee_type")?,
    })
}

pub fn find_user(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_user).optional()?)
}

pub fn find_user_by_username(conn: &Connection, username: &str) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
    Ok(conn.query_row(&sql, [username], map_user).optional()?)
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    Ok(conn.query_row(&sql, [email], map_user).optional()?)
}

/// Username for an id, if the user still exists.
pub fn username_of(conn: &Connection, id: i64) -> Result<Option<String>> {
    conn.query_row("SELECT username FROM users WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .optional()
}

pub fn list_users(conn: &Connection) -> AppResult<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_users_by_role(conn: &Connection, role: Role) -> AppResult<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([role.to_db_str()], map_user)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_by_role(conn: &Connection, role: Role) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1",
        [role.to_db_str()],
        |row| row.get(0),
    )?)
}

/// Insert a user (the `id` field is ignored) and return the new id.
pub fn insert_user(conn: &Connection, user: &User) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, email, password_hash, first_name, last_name, role, employee_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.username,
            user.email,
            user.password_hash,
            user.first_name,
            user.last_name,
            user.role.to_db_str(),
            user.employee_type,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a user (all fields except id)
pub fn update_user(conn: &Connection, user: &User) -> AppResult<()> {
    conn.execute(
        "UPDATE users
         SET username = ?1, email = ?2, password_hash = ?3,
             first_name = ?4, last_name = ?5, role = ?6, employee_type = ?7
         WHERE id = ?8",
        params![
            user.username,
            user.email,
            user.password_hash,
            user.first_name,
            user.last_name,
            user.role.to_db_str(),
            user.employee_type,
            user.id,
        ],
    )?;
    Ok(())
}

pub fn delete_user(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    Ok(())
}
