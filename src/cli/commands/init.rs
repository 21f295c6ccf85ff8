use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::migrate::applied_versions;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::fs;

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`) and the
/// SQLite database with every migration applied.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::resolve_database(cli.db.as_deref());

    let mut cfg = Config::load()?;
    cfg.database = db_path.to_string_lossy().to_string();

    if let Some(dir) = db_path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    info("Initializing timeportal…");

    if !cli.test {
        let path = cfg.save()?;
        success(format!("Config file: {}", path.display()));
    }

    let pool = open_db(&cfg.database)?;
    let versions = applied_versions(&pool.conn)?;

    success(format!(
        "Database initialized at {} ({} migrations applied)",
        cfg.database,
        versions.len()
    ));
    info("Run `timeportal seed` to create the default accounts.");
    Ok(())
}
