//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level when set.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::{Result, ServerError};

/// Initialize the logger at `info`, console only
pub fn init_logger() -> Result<()> {
    init_logger_with_file("info", None)
}

/// Initialize the logger with optional daily rolling file output
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let result = match log_dir {
        Some(dir) => {
            let log_path = Path::new(dir);
            std::fs::create_dir_all(log_path)?;
            let file_appender = tracing_appender::rolling::daily(log_path, "casework-server");
            builder.with_ansi(false).with_writer(file_appender).try_init()
        }
        None => builder.try_init(),
    };

    result.map_err(|e| ServerError::Logging(e.to_string()))
}
