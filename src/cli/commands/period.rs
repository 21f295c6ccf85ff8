use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::hours::format_hours;
use crate::core::period::Period;
use crate::core::submit::period_overview;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{colorize_optional, paint_status};
use crate::utils::date::{today, weekday_short};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Period { period, year, json } = cmd {
        let (pool, ctx) = open_session(cfg)?;
        let today = today();

        let period = Period::resolve(*period, *year, today)?;
        let view = period_overview(&pool.conn, &ctx, &period, today)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        header(format!("{} · {}", ctx.username, period));

        for (w, week) in view.days.chunks(7).enumerate() {
            let mut table = Table::new(&["Date", "Day", "Start", "End", "Break", "Code", "Modifiers", "Hours", "Status"]);

            for day in week {
                let row = match &day.record {
                    Some(ts) => vec![
                        ts.date_str(),
                        weekday_short(day.date).to_string(),
                        colorize_optional(&ts.start_str()),
                        colorize_optional(&ts.end_str()),
                        ts.break_minutes.to_string(),
                        ts.code_name().to_string(),
                        ts.modifiers.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(";"),
                        format_hours(day.hours),
                        paint_status(ts.status),
                    ],
                    None => vec![
                        day.date.format("%Y-%m-%d").to_string(),
                        weekday_short(day.date).to_string(),
                        colorize_optional(""),
                        colorize_optional(""),
                        String::new(),
                        String::new(),
                        String::new(),
                        String::new(),
                        String::new(),
                    ],
                };
                table.add_row(row);
            }

            println!("Week {}", w + 1);
            print!("{}", table.render());
            println!("Week total: {}\n", format_hours(view.week_totals[w]));
        }

        println!("Period total: {}", format_hours(view.total));
        println!("◀ previous: {}   next: {} ▶", view.previous, view.next);

        if view.read_only {
            warning("This period is closed: days can no longer be submitted.");
        }
    }
    Ok(())
}
