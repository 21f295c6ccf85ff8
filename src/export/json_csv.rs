// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io;
use std::path::Path;

/// A titled block of the CSV output: optional title row, header, rows.
pub(crate) struct CsvSection<'a> {
    pub title: Option<&'a str>,
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
}

/// JSON with four-space indentation.
pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)?;
    Ok(buf)
}

/// Sections are separated by one empty line.
pub(crate) fn render_csv(sections: &[CsvSection<'_>]) -> AppResult<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(&render_section(section)?);
    }

    Ok(out)
}

fn render_section(section: &CsvSection<'_>) -> AppResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    if let Some(title) = section.title {
        wtr.write_record([title])?;
    }
    wtr.write_record(section.headers)?;
    for row in &section.rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| AppError::from(io::Error::other(format!("CSV buffer error: {e}"))))
}

pub(crate) fn write_output(bytes: &[u8], path: &Path, label: &str) -> AppResult<()> {
    info(format!("Exporting to {label}: {}", path.display()));
    fs::write(path, bytes)?;
    notify_export_success(label, path);
    Ok(())
}
