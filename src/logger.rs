//! Logging setup on top of the `log` facade.
//!
//! Records are routed through a `fern` dispatch to stderr and, when
//! configured, to a log file.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

use crate::config::LoggingConfig;
use crate::constants::{APP_NAME, LOG_FILE_NAME};

/// Default log file location inside the user's cache directory
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))
        .map(|dir| dir.join(APP_NAME).join(LOG_FILE_NAME))
}

/// Resolve the file the dispatch writes to, if any
pub fn resolve_log_file(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }
    match &config.file {
        Some(path) => Ok(Some(path.clone())),
        None => get_log_file_path().map(Some),
    }
}

/// Build the dispatch for a logging configuration without installing it.
///
/// A disabled configuration still yields a dispatch, filtered to `Off`.
pub fn build_dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let level = if config.enabled {
        config.level_filter()?
    } else {
        log::LevelFilter::Off
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = resolve_log_file(config)? {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    Ok(dispatch)
}

/// Install the global logger.
///
/// Returns `Ok(false)` when a logger was already installed by an earlier call.
pub fn init(config: &LoggingConfig) -> Result<bool> {
    let dispatch = build_dispatch(config)?;
    match dispatch.apply() {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
