//! Logging setup
//!
//! Only initializes if FREEWRITE_LOG is set (e.g. `FREEWRITE_LOG=debug`).
//! Logs go to a file (config.log_file or {data_dir}/debug.log) so they never
//! interleave with command output or the writing session.

use std::fs::File;
use std::sync::Mutex;

use freewrite_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "FREEWRITE_LOG";

pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "freewrite_core={},freewrite_cli={}",
        log_level, log_level
    ));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
