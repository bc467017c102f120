//! Environment-driven configuration for the viewer binary.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::snapshot::{CategoryPolicy, FixedCategory, DEFAULT_RESERVED_KEY};
use crate::source::{CacheBust, DirSource, FetchError, HttpSource, HttpSourceConfig, ResourceSource};
use crate::viewer::ViewerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Http(HttpSourceConfig),
    Dir(PathBuf),
}

impl SourceConfig {
    pub fn build(&self) -> Result<Arc<dyn ResourceSource>, FetchError> {
        match self {
            Self::Http(cfg) => Ok(Arc::new(HttpSource::new(cfg.clone())?)),
            Self::Dir(root) => Ok(Arc::new(DirSource::new(root.clone()))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Dir(_) => "dir",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub viewer: ViewerConfig,
    pub initial_date: Option<String>,
    pub output: Option<PathBuf>,
    pub page_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::Dir(PathBuf::from("docs")),
            viewer: ViewerConfig::default(),
            initial_date: None,
            output: None,
            page_title: "Daily Hot News".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
    #[error("NEWSDECK_CATEGORIES declares no categories")]
    EmptyCategoryList,
}

pub fn app_config_from_env() -> Result<AppConfig, ConfigError> {
    app_config_from_lookup(|key| env::var(key).ok())
}

/// Builds the config from an arbitrary variable lookup; blank values count as unset.
pub fn app_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let mut config = AppConfig::default();

    if let Some(base_url) = get("NEWSDECK_BASE_URL") {
        let mut http = HttpSourceConfig::new(base_url);
        if let Some(raw) = get("NEWSDECK_HTTP_TIMEOUT_MS") {
            http.timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "NEWSDECK_HTTP_TIMEOUT_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get("NEWSDECK_CACHE_BUST") {
            let enabled = parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                var: "NEWSDECK_CACHE_BUST",
                value: raw.clone(),
            })?;
            http.cache_bust = if enabled {
                CacheBust::Timestamp
            } else {
                CacheBust::Disabled
            };
        }
        config.source = SourceConfig::Http(http);
    } else if let Some(dir) = get("NEWSDECK_DATA_DIR") {
        config.source = SourceConfig::Dir(PathBuf::from(dir));
    }

    if let Some(path) = get("NEWSDECK_INDEX_PATH") {
        config.viewer.index_path = path;
    }
    if let Some(prefix) = get("NEWSDECK_SNAPSHOT_PREFIX") {
        config.viewer.snapshot_prefix = prefix;
    }
    if let Some(suffix) = get("NEWSDECK_SNAPSHOT_SUFFIX") {
        config.viewer.snapshot_suffix = suffix;
    }

    let reserved_key =
        get("NEWSDECK_RESERVED_KEY").unwrap_or_else(|| DEFAULT_RESERVED_KEY.to_string());
    config.viewer.category_policy = match get("NEWSDECK_CATEGORIES") {
        Some(raw) if !raw.eq_ignore_ascii_case("dynamic") => parse_fixed_categories(&raw)?,
        _ => CategoryPolicy::Dynamic { reserved_key },
    };

    config.initial_date = get("NEWSDECK_DATE");
    config.output = get("NEWSDECK_OUTPUT").map(PathBuf::from);
    if let Some(title) = get("NEWSDECK_TITLE") {
        config.page_title = title;
    }

    Ok(config)
}

/// Parses `key[=label],key[=label]` into a fixed category list. A repeated key keeps
/// its first label.
pub fn parse_fixed_categories(raw: &str) -> Result<CategoryPolicy, ConfigError> {
    let mut seen = HashSet::new();
    let fixed: Vec<FixedCategory> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, label)) if !label.trim().is_empty() => {
                FixedCategory::new(key.trim(), label.trim())
            }
            Some((key, _)) => FixedCategory::new(key.trim(), key.trim()),
            None => FixedCategory::new(entry, entry),
        })
        .filter(|category| seen.insert(category.key.clone()))
        .collect();

    if fixed.is_empty() {
        return Err(ConfigError::EmptyCategoryList);
    }
    Ok(CategoryPolicy::Fixed(fixed))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
