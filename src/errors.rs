//! Unified application error type.
//! All modules (db, core, export, cli) return AppError so the boundary can
//! decide in one place how a failure is shown to the user.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // User-correctable failures
    // ---------------------------
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No active session: run `timeportal login <username>` first")]
    NotLoggedIn,

    // ---------------------------
    // Permanent failures
    // ---------------------------
    #[error("{resource} #{id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    // ---------------------------
    // Config / security plumbing
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl AppError {
    /// Validation and authorization failures are shown as warnings and never
    /// leave state behind; everything else is terminal.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Forbidden(_)
                | AppError::InvalidCredentials
                | AppError::NotLoggedIn
        )
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden<S: Into<String>>(msg: S) -> Self {
        AppError::Forbidden(msg.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
