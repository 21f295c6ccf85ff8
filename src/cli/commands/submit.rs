use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::hours::format_hours;
use crate::core::input::DayEntry;
use crate::core::period::Period;
use crate::core::submit::submit_period;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::today;

/// Submit one or more days of a period.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Submit { period, year, days } = cmd {
        //
        // 1. Parse every day before touching the database
        //
        let entries: Vec<DayEntry> = days
            .iter()
            .map(|raw| raw.parse::<DayEntry>())
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|d| d.with_default_break(cfg.default_break_minutes))
            .collect();

        for e in &entries {
            if let (Some(start), Some(end)) = (e.start, e.end)
                && end <= start
            {
                warning(format!(
                    "{}: end {} is not after start {}; the day counts as 0 hours",
                    e.date,
                    end.format("%H:%M"),
                    start.format("%H:%M")
                ));
            }
        }

        //
        // 2. Resolve the period (default: current)
        //
        let today = today();
        let period = Period::resolve(*period, *year, today)?;

        //
        // 3. Store
        //
        let (pool, ctx) = open_session(cfg)?;
        let outcome = submit_period(&pool.conn, &ctx, &period, &entries, today)?;

        for ts in &outcome.records {
            success(format!(
                "#{} {} {}-{} {} → {} h (submitted)",
                ts.id,
                ts.date_str(),
                ts.start_str(),
                ts.end_str(),
                ts.code_name(),
                format_hours(ts.total_hours())
            ));
        }
        if outcome.skipped > 0 {
            info(format!(
                "{} incomplete day(s) skipped (start, end and code are required)",
                outcome.skipped
            ));
        }
    }
    Ok(())
}
