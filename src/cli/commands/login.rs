use crate::cli::commands::{open, open_session};
use crate::cli::parser::Commands;
use crate::cli::session;
use crate::config::Config;
use crate::core::auth;
use crate::core::context::RequestSource;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::io::{self, BufRead, Write};

fn read_password() -> AppResult<String> {
    print!("Password: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Login { username, password } => {
            let pool = open(cfg)?;
            let password = match password {
                Some(p) => p.clone(),
                None => read_password()?,
            };

            let ctx = auth::login(&pool.conn, username, &password, RequestSource::local())?;
            session::save(&cfg.database, &ctx)?;

            success(format!("Logged in as {} ({})", ctx.username, ctx.role));
        }

        Commands::Logout => {
            let (pool, ctx) = open_session(cfg)?;
            auth::logout(&pool.conn, &ctx)?;
            session::clear(&cfg.database)?;
            success(format!("{} logged out", ctx.username));
        }

        Commands::Whoami => {
            let (_pool, ctx) = open_session(cfg)?;
            info(format!("{} (id {}, {})", ctx.username, ctx.user_id, ctx.role));
        }

        _ => {}
    }
    Ok(())
}
