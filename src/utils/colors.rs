//! Colour helpers for terminal output.

use crate::models::audit::AuditAction;
use crate::models::timesheet::TimesheetStatus;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

pub fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

pub fn color_for_status(status: TimesheetStatus) -> Colour {
    match status {
        TimesheetStatus::Submitted => Colour::Yellow,
        TimesheetStatus::Approved => Colour::Green,
        TimesheetStatus::Rejected => Colour::Red,
    }
}

pub fn paint_status(status: TimesheetStatus) -> String {
    color_for_status(status).paint(status.as_str()).to_string()
}

pub fn color_for_action(action: AuditAction) -> Colour {
    match action {
        AuditAction::Create => Colour::Green,
        AuditAction::Delete => Colour::Red,
        AuditAction::Update => Colour::Yellow,
        AuditAction::Approve => Colour::Cyan,
        AuditAction::Reject => Colour::Purple,
        AuditAction::LoginFailed => Colour::RGB(255, 153, 51),
        AuditAction::LoginSuccess | AuditAction::Logout => Colour::Blue,
    }
}

/// Grey for empty cells ("" or "--:--").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" {
        Colour::Fixed(8).paint(if v.is_empty() { "--:--" } else { v }).to_string()
    } else {
        value.to_string()
    }
}
