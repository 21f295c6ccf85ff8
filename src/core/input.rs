//! Typed commands handed to the core by the boundary.
//!
//! Each type is checked once when it is built (`FromStr` / `validate`), so
//! core operations only deal with well-formed values.

use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::utils::date::parse_date_arg;
use crate::utils::time::parse_optional_time;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 64;
pub const NAME_MAX: usize = 64;
pub const PASSWORD_MIN: usize = 6;
pub const EMPLOYEE_TYPES: [&str; 2] = ["regulier", "hebdomadaire"];
/// One day, in minutes. Upper bound of a break and of a modifier offset.
pub const DAY_MINUTES: i64 = 1440;

fn parse_break(raw: &str) -> AppResult<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let mins: i64 = raw
        .parse()
        .map_err(|_| AppError::validation(format!("invalid break '{}' (minutes)", raw)))?;
    check_break(mins)?;
    Ok(Some(mins))
}

pub fn check_break(mins: i64) -> AppResult<()> {
    if !(0..=DAY_MINUTES).contains(&mins) {
        return Err(AppError::validation(format!(
            "break must be between 0 and {DAY_MINUTES} minutes, got {mins}"
        )));
    }
    Ok(())
}

pub fn check_offset(mins: i64) -> AppResult<()> {
    if !(-DAY_MINUTES..=DAY_MINUTES).contains(&mins) {
        return Err(AppError::validation(format!(
            "modifier offset must be between -{DAY_MINUTES} and {DAY_MINUTES} minutes, got {mins}"
        )));
    }
    Ok(())
}

fn non_empty(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty()).then(|| t.to_string())
}

// ---------------------------------------------------------------------------
// Days
// ---------------------------------------------------------------------------

/// One day of a period submission.
///
/// Text form: `DATE,START,END,CODE[,BREAK[,MOD;MOD...]]`. Everything but
/// the date may be left empty; incomplete days are skipped on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub code: Option<String>,
    pub break_minutes: Option<i64>,
    pub modifiers: Vec<String>,
    pub description: Option<String>,
}

impl DayEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start: None,
            end: None,
            code: None,
            break_minutes: None,
            modifiers: Vec::new(),
            description: None,
        }
    }

    /// A day is only stored when start, end and code are all present.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some() && self.code.is_some()
    }

    /// Fill a missing break with `minutes`.
    pub fn with_default_break(mut self, minutes: i64) -> Self {
        if self.break_minutes.is_none() {
            self.break_minutes = Some(minutes);
        }
        self
    }
}

impl FromStr for DayEntry {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() > 6 {
            return Err(AppError::validation(format!(
                "too many fields in '{}' (expected DATE,START,END,CODE[,BREAK[,MOD;MOD]])",
                s
            )));
        }

        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        let mut day = DayEntry::new(parse_date_arg(field(0))?);
        day.start = parse_optional_time(Some(field(1)))?;
        day.end = parse_optional_time(Some(field(2)))?;
        day.code = non_empty(field(3));
        day.break_minutes = parse_break(field(4))?;
        day.modifiers = field(5).split(';').filter_map(non_empty).collect();

        Ok(day)
    }
}

/// Direct edit of an existing record. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub break_minutes: Option<i64>,
    pub code: Option<String>,
    pub modifiers: Option<Vec<String>>,
    pub description: Option<String>,
}

impl RecordEdit {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(b) = self.break_minutes {
            check_break(b)?;
        }
        if self.is_empty() {
            return Err(AppError::validation("nothing to change"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == RecordEdit::default()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

fn check_username(username: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(AppError::validation(format!(
            "username must be {USERNAME_MIN} to {USERNAME_MAX} characters"
        )));
    }
    Ok(())
}

fn check_email(email: &str) -> AppResult<()> {
    let valid = email_regex().is_some_and(|re| re.is_match(email));
    if !valid {
        return Err(AppError::validation(format!("invalid e-mail address '{}'", email)));
    }
    Ok(())
}

fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(AppError::validation(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

fn check_name(label: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{label} is required")));
    }
    if value.chars().count() > NAME_MAX {
        return Err(AppError::validation(format!(
            "{label} must be at most {NAME_MAX} characters"
        )));
    }
    Ok(())
}

fn check_employee_type(value: &str) -> AppResult<()> {
    if !EMPLOYEE_TYPES.contains(&value) {
        return Err(AppError::validation(format!(
            "invalid employee type '{}' (expected one of: {})",
            value,
            EMPLOYEE_TYPES.join(", ")
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub employee_type: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> AppResult<()> {
        check_username(&self.username)?;
        check_email(&self.email)?;
        check_password(&self.password)?;
        check_name("first name", &self.first_name)?;
        check_name("last name", &self.last_name)?;
        if let Some(t) = &self.employee_type {
            check_employee_type(t)?;
        }
        Ok(())
    }
}

/// Partial update of a user account. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub employee_type: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(u) = &self.username {
            check_username(u)?;
        }
        if let Some(e) = &self.email {
            check_email(e)?;
        }
        if let Some(f) = &self.first_name {
            check_name("first name", f)?;
        }
        if let Some(l) = &self.last_name {
            check_name("last name", l)?;
        }
        if let Some(t) = &self.employee_type {
            check_employee_type(t)?;
        }
        if let Some(p) = &self.password {
            check_password(p)?;
        }
        Ok(())
    }
}
