use crate::errors::{AppError, AppResult};
use crate::utils::date::month_last_day;
use chrono::NaiveDate;

fn bad(msg: &str, raw: &str) -> AppError {
    AppError::validation(format!("{msg} in range '{raw}'"))
}

fn parse_year(s: &str, raw: &str) -> AppResult<i32> {
    s.parse().map_err(|_| bad("invalid year", raw))
}

fn parse_month(s: &str, raw: &str) -> AppResult<(i32, u32)> {
    let (y, m) = s.split_once('-').ok_or_else(|| bad("invalid month", raw))?;
    let year = parse_year(y, raw)?;
    let month: u32 = m.parse().map_err(|_| bad("invalid month", raw))?;
    if !(1..=12).contains(&month) {
        return Err(bad("invalid month", raw));
    }
    Ok((year, month))
}

/// Bounds of a single range term, by its shape.
fn term_bounds(term: &str, raw: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match term.len() {
        // YYYY
        4 => {
            let y = parse_year(term, raw)?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", raw))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", raw))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let (y, m) = parse_month(term, raw)?;
            let last = month_last_day(y, m).ok_or_else(|| bad("invalid month", raw))?;
            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| bad("invalid month", raw))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| bad("invalid month", raw))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(term, "%Y-%m-%d").map_err(|_| bad("invalid date", raw))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported format", raw)),
    }
}

/// Parse a `--range` filter into inclusive bounds.
///
/// Accepted shapes:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
///
/// `all` (any case) means no bounds.
pub fn parse_range(r: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let (start, end) = match r.split_once(':') {
        Some((s, e)) => {
            let (s, e) = (s.trim(), e.trim());
            if s.len() != e.len() {
                return Err(bad("start and end must have the same format", r));
            }
            (term_bounds(s, r)?.0, term_bounds(e, r)?.1)
        }
        None => term_bounds(r, r)?,
    };

    if start > end {
        return Err(bad("start is after end", r));
    }
    Ok(Some((start, end)))
}
