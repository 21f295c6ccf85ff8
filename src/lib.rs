//! timeportal library root.
//! Exposes the CLI parser, the command dispatcher and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Seed => commands::seed::handle(cfg),
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            commands::login::handle(&cli.command, cfg)
        }
        Commands::Period { .. } => commands::period::handle(&cli.command, cfg),
        Commands::Submit { .. } => commands::submit::handle(&cli.command, cfg),
        Commands::Edit { .. } => commands::edit::handle(&cli.command, cfg),
        Commands::List { .. } => commands::list::handle(&cli.command, cfg),
        Commands::Pending | Commands::Approve { .. } | Commands::Reject { .. } => {
            commands::approve::handle(&cli.command, cfg)
        }
        Commands::Report { .. } | Commands::Stats => commands::report::handle(&cli.command, cfg),
        Commands::User { .. } => commands::user::handle(&cli.command, cfg),
        Commands::Code { .. } | Commands::Modifier { .. } => {
            commands::catalog::handle(&cli.command, cfg)
        }
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
    }
}

/// Configuration file plus the `--db` / `TIMEPORTAL_DB` overrides.
pub fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut cfg = Config::load()?;
    cfg.apply_overrides(cli.db.as_deref());
    Ok(cfg)
}
