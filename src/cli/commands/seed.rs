use crate::cli::commands::open;
use crate::config::Config;
use crate::core::context::RequestSource;
use crate::core::users::{SEED_PASSWORD, seed};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open(cfg)?;
    let report = seed(&pool.conn, RequestSource::local())?;

    if report.is_empty() {
        info("Nothing to seed: default accounts and catalog already exist.");
        return Ok(());
    }

    for u in &report.users {
        success(format!("User '{u}' created (password: {SEED_PASSWORD})"));
    }
    for c in &report.codes {
        success(format!("Code '{c}' created"));
    }
    for m in &report.modifiers {
        success(format!("Modifier '{m}' created"));
    }
    Ok(())
}
