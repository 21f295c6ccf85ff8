use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::hours::format_hours;
use crate::core::input::RecordEdit;
use crate::core::submit::edit_record;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::parse_optional_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        start,
        end,
        break_minutes,
        code,
        modifiers,
        description,
    } = cmd
    {
        let edit = RecordEdit {
            start: parse_optional_time(start.as_deref())?,
            end: parse_optional_time(end.as_deref())?,
            break_minutes: *break_minutes,
            code: code.clone(),
            modifiers: modifiers.as_ref().map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .collect()
            }),
            description: description.clone(),
        };
        edit.validate()?;

        let (pool, ctx) = open_session(cfg)?;
        let ts = edit_record(&pool.conn, &ctx, *id, &edit)?;

        success(format!(
            "#{} {} updated → {} h",
            ts.id,
            ts.date_str(),
            format_hours(ts.total_hours())
        ));
    }
    Ok(())
}
