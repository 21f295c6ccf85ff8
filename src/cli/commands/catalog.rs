use crate::cli::commands::{open, open_session};
use crate::cli::parser::{CodeAction, Commands, ModifierAction};
use crate::cli::session;
use crate::config::Config;
use crate::core::catalog::{add_code, add_modifier, list_codes, list_modifiers, set_modifier_minutes};
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_offset;
use crate::utils::table::Table;

/// `code` and `modifier`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Code { action } => match action {
            CodeAction::Add { name } => {
                let (pool, ctx) = open_session(cfg)?;
                let code = add_code(&pool.conn, &ctx, name)?;
                success(format!("Code '{}' created with id {}", code.name, code.id));
            }
            CodeAction::List => {
                let pool = open(cfg)?;
                session::require(&pool.conn, &cfg.database)?;

                let mut table = Table::new(&["ID", "Code"]);
                for c in list_codes(&pool.conn)? {
                    table.add_row(vec![c.id.to_string(), c.name]);
                }
                print!("{}", table.render());
            }
        },

        Commands::Modifier { action } => match action {
            ModifierAction::Add { name, minutes } => {
                let (pool, ctx) = open_session(cfg)?;
                let m = add_modifier(&pool.conn, &ctx, name, *minutes)?;
                success(format!("Modifier '{}' created ({} min)", m.name, minutes));
            }
            ModifierAction::Set { name, minutes } => {
                let (pool, ctx) = open_session(cfg)?;
                let m = set_modifier_minutes(&pool.conn, &ctx, name, Some(*minutes))?;
                success(format!("Modifier '{}' now {} min", m.name, minutes));
            }
            ModifierAction::List => {
                let pool = open(cfg)?;
                session::require(&pool.conn, &cfg.database)?;

                let mut table = Table::new(&["ID", "Modifier", "Offset"]);
                for m in list_modifiers(&pool.conn)? {
                    table.add_row(vec![
                        m.id.to_string(),
                        m.name,
                        m.minutes.map(format_offset).unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render());
            }
        },

        _ => {}
    }
    Ok(())
}
