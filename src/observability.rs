//! Logging setup plus the structured events emitted by a viewer load cycle.
//!
//! Every event carries `component` and `event` fields so JSON output can be filtered
//! by load stage (`dates.load.*`, `snapshot.load.*`).

use std::env;

use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::parse_bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `newsdeck=debug`.
    pub level: String,
    pub format: LogFormat,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub fn logging_config_from_env() -> LoggingConfig {
    logging_config_from_lookup(|key| env::var(key).ok())
}

/// Unknown or blank values keep the default rather than failing startup.
pub fn logging_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoggingConfig {
    let defaults = LoggingConfig::default();
    let level = lookup("NEWSDECK_LOG_LEVEL")
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or(defaults.level);
    let format = lookup("NEWSDECK_LOG_FORMAT")
        .and_then(|raw| LogFormat::from_name(&raw))
        .unwrap_or(defaults.format);
    let include_target = lookup("NEWSDECK_LOG_TARGET")
        .and_then(|raw| parse_bool(&raw))
        .unwrap_or(defaults.include_target);

    LoggingConfig {
        level,
        format,
        include_target,
    }
}

/// Installs the global subscriber on stderr; stdout is reserved for the rendered page.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_target)
        .with_writer(std::io::stderr);

    if config.format == LogFormat::Json {
        tracing::subscriber::set_global_default(builder.with_ansi(false).json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())?;
    }
    Ok(())
}

pub fn log_app_start(config: &LoggingConfig) {
    info!(
        component = "snapshot_viewer",
        event = "app.start",
        log_level = %config.level,
        log_format = ?config.format
    );
}

pub fn log_source_selected(source: &str, location: &str) {
    info!(
        component = "snapshot_viewer",
        event = "source.selected",
        source,
        location
    );
}

pub fn log_page_written(destination: &str, bytes: usize) {
    info!(
        component = "snapshot_viewer",
        event = "page.written",
        destination,
        bytes
    );
}

pub(crate) fn log_dates_start(path: &str, source: &str, token: u64) {
    info!(
        component = "viewer",
        event = "dates.load.start",
        path,
        source,
        token
    );
}

pub(crate) fn log_dates_failed(path: &str, error: &dyn std::error::Error) {
    warn!(
        component = "viewer",
        event = "dates.load.failed",
        path,
        error = %error
    );
}

pub(crate) fn log_dates_empty() {
    info!(component = "viewer", event = "dates.load.empty");
}

pub(crate) fn log_dates_finish(date_count: usize, newest: &str) {
    info!(
        component = "viewer",
        event = "dates.load.finish",
        date_count,
        newest
    );
}

pub(crate) fn log_dates_superseded(token: u64) {
    debug!(component = "viewer", event = "dates.load.superseded", token);
}

pub(crate) fn log_selection_ignored(date: &str) {
    debug!(component = "viewer", event = "dates.select.ignored", date);
}

pub(crate) fn log_selection_unknown(date: &str) {
    debug!(component = "viewer", event = "dates.select.unknown", date);
}

pub(crate) fn log_snapshot_start(date: &str, path: &str, token: u64) {
    info!(
        component = "viewer",
        event = "snapshot.load.start",
        date,
        path,
        token
    );
}

pub(crate) fn log_snapshot_failed(date: &str, path: &str, error: &dyn std::error::Error) {
    warn!(
        component = "viewer",
        event = "snapshot.load.failed",
        date,
        path,
        error = %error
    );
}

pub(crate) fn log_snapshot_finish(date: &str, category_count: usize, item_count: usize) {
    info!(
        component = "viewer",
        event = "snapshot.load.finish",
        date,
        category_count,
        item_count
    );
}

pub(crate) fn log_snapshot_superseded(date: &str, token: u64) {
    info!(
        component = "viewer",
        event = "snapshot.load.superseded",
        date,
        token
    );
}
