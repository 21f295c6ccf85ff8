use crate::cli::commands::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::db::stats::collect_stats;
use crate::errors::AppResult;
use ansi_term::Colour::{Cyan, Green, Red};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info,
    } = cmd
    {
        // opening already applies pending migrations
        let pool = open(cfg)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}", Cyan.paint("▶ Running migrations…"));
            let applied = run_pending_migrations(&pool.conn)?;
            println!("{}\n", Green.paint(format!("✔ Schema up to date ({applied} pending applied).")));
        }

        //
        // 2) INFO
        //
        if *info {
            let versions = applied_versions(&pool.conn)?;
            let stats = collect_stats(&pool.conn)?;

            println!("🗄️  Database   : {}", cfg.database);
            println!("📦 Migrations : {}", versions.join(", "));
            println!(
                "👥 Users      : {} ({} employees, {} managers, {} admins)",
                stats.users.total, stats.users.employees, stats.users.managers, stats.users.admins
            );
            println!("🗓️  Timesheets : {}", stats.timesheets.total);
            println!("📜 Audit log  : {} entries\n", stats.audit_entries);
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}", Cyan.paint("▶ Running integrity check…"));

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}\n", Green.paint("✔ Integrity check passed."));
            } else {
                println!("{} {}\n", Red.paint("✘ Integrity check failed:"), integrity);
            }
        }
    }

    Ok(())
}
