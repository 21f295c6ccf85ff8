use crate::cli::commands::{open_session, status_filter};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::hours::format_hours;
use crate::core::calculator::totals::sum_hours;
use crate::core::submit::list_records;
use crate::db::timesheets::TimesheetFilter;
use crate::db::users::list_users;
use crate::errors::AppResult;
use crate::models::timesheet::Timesheet;
use crate::ui::messages::info;
use crate::utils::colors::{colorize_optional, paint_status};
use crate::utils::range::parse_range;
use crate::utils::table::Table;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        user,
        range,
        status,
        json,
    } = cmd
    {
        let bounds = match range {
            Some(r) => parse_range(r)?,
            None => None,
        };

        let filter = TimesheetFilter {
            user_id: *user,
            from: bounds.map(|b| b.0),
            to: bounds.map(|b| b.1),
            status: status_filter(*status),
        };

        let (pool, ctx) = open_session(cfg)?;
        let records = list_records(&pool.conn, &ctx, &filter)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            info("No timesheets found.");
            return Ok(());
        }

        let names: HashMap<i64, String> = list_users(&pool.conn)?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        print!("{}", render(&records, &names).render());
        println!("Total: {} h in {} record(s)", format_hours(sum_hours(&records)), records.len());
    }
    Ok(())
}

/// Shared with `pending`.
pub(crate) fn render(records: &[Timesheet], names: &HashMap<i64, String>) -> Table {
    let mut table = Table::new(&[
        "ID", "User", "Date", "Start", "End", "Break", "Code", "Hours", "Status",
    ]);
    for ts in records {
        table.add_row(vec![
            ts.id.to_string(),
            names.get(&ts.user_id).cloned().unwrap_or_else(|| ts.user_id.to_string()),
            ts.date_str(),
            colorize_optional(&ts.start_str()),
            colorize_optional(&ts.end_str()),
            ts.break_minutes.to_string(),
            ts.code_name().to_string(),
            format_hours(ts.total_hours()),
            paint_status(ts.status),
        ]);
    }
    table
}
