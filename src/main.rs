//! timeportal entrypoint.

use clap::Parser;
use std::process;
use timeportal::cli::parser::Cli;
use timeportal::config::default_log_filter;
use timeportal::errors::AppError;
use timeportal::ui::messages::{error, warning};
use timeportal::{dispatch, load_config};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Env variable holding the log filter (same syntax as RUST_LOG).
const LOG_ENV: &str = "TIMEPORTAL_LOG";

fn init_tracing(fallback: &str) {
    let directives = std::env::var(LOG_ENV).unwrap_or_else(|_| fallback.to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report(e: &AppError) {
    if e.is_user_error() {
        warning(e);
    } else {
        error(e);
    }
}

fn main() {
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(&default_log_filter());
            report(&e);
            process::exit(1);
        }
    };

    init_tracing(&cfg.log_filter);

    if let Err(e) = dispatch(&cli, &cfg) {
        tracing::debug!(error = ?e, "command failed");
        report(&e);
        process::exit(1);
    }
}
