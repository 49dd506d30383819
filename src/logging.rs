//! Opt-in diagnostics. The terminal belongs to the UI, so log lines go to a
//! file instead of stderr.

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use env_logger::{Builder, Target};

use crate::config::Config;

/// Install the global logger when a filter is configured. Returns whether a
/// logger was installed.
pub fn init(config: &Config) -> Result<bool> {
    let Some(filter) = config.log_filter.as_deref() else {
        return Ok(false);
    };

    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    Builder::new()
        .parse_filters(filter)
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;

    log::info!("logging to {}", config.log_path.display());
    Ok(true)
}
