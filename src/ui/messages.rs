//! Coloured one-line messages for the terminal.
//!
//! Informational output goes to stdout; warnings and errors go to stderr so
//! that listings and exports piped elsewhere stay clean.

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn tag(colour: Colour, icon: &str) -> String {
    colour.bold().paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Red, ICON_ERR), msg);
}

/// Section title above a listing.
pub fn header<T: fmt::Display>(msg: T) {
    let line = format!("====================== {msg}");
    println!("{}\n", Style::new().bold().fg(Colour::Blue).paint(line));
}
