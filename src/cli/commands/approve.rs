use crate::cli::commands::list::render;
use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval::{approve, pending, reject};
use crate::core::calculator::hours::format_hours;
use crate::db::users::list_users;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::collections::HashMap;

/// `approve`, `reject` and `pending`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (pool, ctx) = open_session(cfg)?;

    match cmd {
        Commands::Approve { id } => {
            let ts = approve(&pool.conn, &ctx, *id)?;
            success(format!(
                "#{} ({}) approved: {} h",
                ts.id,
                ts.date_str(),
                format_hours(ts.total_hours())
            ));
        }

        Commands::Reject { id } => {
            let ts = reject(&pool.conn, &ctx, *id)?;
            success(format!(
                "#{} ({}) rejected: {} h",
                ts.id,
                ts.date_str(),
                format_hours(ts.total_hours())
            ));
        }

        Commands::Pending => {
            let records = pending(&pool.conn, &ctx)?;
            if records.is_empty() {
                info("No timesheets waiting for a decision.");
                return Ok(());
            }
            let names: HashMap<i64, String> = list_users(&pool.conn)?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect();
            print!("{}", render(&records, &names).render());
        }

        _ => {}
    }
    Ok(())
}
