//! Plain-text tables for CLI listings.

use crate::utils::colors::strip_ansi;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column widths, measured without colour codes.
    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(strip_ansi(cell).chars().count());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let pad = |cell: &str, w: usize| {
            let visible = strip_ansi(cell).chars().count();
            format!("{}{} ", cell, " ".repeat(w.saturating_sub(visible)))
        };

        for (h, w) in self.headers.iter().zip(&widths) {
            out.push_str(&pad(h, *w));
        }
        out.push('\n');

        let total: usize = widths.iter().map(|w| w + 1).sum();
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for row in &self.rows {
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&pad(cell, *w));
            }
            out.push('\n');
        }

        out
    }
}
