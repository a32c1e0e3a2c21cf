//! Tracing setup.
//!
//! The terminal UI owns stdout, so log lines go to a file. `QUIZ_LOG` holds
//! the filter directives (default `info,quiz_console=debug`).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "QUIZ_LOG";

pub fn init_tracing(log_file: &Path) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new("info,quiz_console=debug"));
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}
