use crate::cli::commands::export::parse_action;
use crate::cli::commands::open_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::audit::{known_actions, list_entries};
use crate::db::audit_log::{AuditFilter, AuditOrder};
use crate::errors::AppResult;
use crate::models::audit::AuditEntry;
use crate::ui::messages::info;
use crate::utils::colors::{color_for_action, strip_ansi};
use crate::utils::formatting::{truncate, wrap_indented};
use crate::utils::range::parse_range;
use chrono::Local;

const TARGET_MAX: usize = 40;

/// "action resource#id", with only the action coloured.
fn describe(e: &AuditEntry) -> String {
    let target = match e.resource_id {
        Some(id) => format!("{}#{}", e.resource, id),
        None => e.resource.to_string(),
    };
    let plain = truncate(&format!("{} {}", e.action, target), TARGET_MAX);
    let colour = color_for_action(e.action);

    match plain.split_once(' ') {
        Some((action, rest)) => format!("{} {}", colour.paint(action), rest),
        None => colour.paint(plain.as_str()).to_string(),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        action,
        username,
        range,
        limit,
    } = cmd
    {
        let bounds = match range {
            Some(r) => parse_range(r)?,
            None => None,
        };

        let filter = AuditFilter {
            action: action.as_deref().map(parse_action).transpose()?,
            username: username.clone(),
            from: bounds.map(|b| b.0),
            to: bounds.map(|b| b.1),
        };

        let (pool, ctx) = open_session(cfg)?;
        let mut entries = list_entries(&pool.conn, &ctx, &filter, AuditOrder::NewestFirst)?;
        if *limit > 0 {
            entries.truncate(*limit);
        }

        let actions = known_actions(&pool.conn, &ctx)?;
        let hint = format!("Actions in the log: {}", actions.join(", "));

        if entries.is_empty() {
            info("No audit entries found.");
            if !actions.is_empty() {
                info(hint);
            }
            return Ok(());
        }

        println!("📜 Audit log:\n");

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let user_w = entries
            .iter()
            .map(|e| e.username.as_deref().unwrap_or("Anonymous").len())
            .max()
            .unwrap_or(9);

        for e in &entries {
            let when = e.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
            let what = describe(e);
            let padding = " ".repeat(TARGET_MAX.saturating_sub(strip_ansi(&what).chars().count()));
            let prefix = format!(
                "{:>id_w$}: {} | {:<user_w$} | {}{} => ",
                e.id,
                when,
                e.username.as_deref().unwrap_or("Anonymous"),
                what,
                padding,
            );
            let indent = strip_ansi(&prefix).chars().count();
            let details = e.details.as_deref().unwrap_or("");

            println!("{}{}", prefix, wrap_indented(details, 60, indent));
        }

        println!();
        info(hint);
    }
    Ok(())
}
