//! newsdeck core crate.
//!
//! Loads the published date index, then fetches and renders the categorized news
//! snapshot for the selected date:
//! - date index parsing and newest-first selection
//! - snapshot parsing with fixed or dynamic category resolution
//! - page view state and HTML rendering with escaping
//! - viewer orchestration with stale-response discard

mod config;
mod dates;
mod observability;
mod page;
mod render;
mod snapshot;
mod source;
mod viewer;

pub use config::{
    app_config_from_env, app_config_from_lookup, parse_fixed_categories, AppConfig, ConfigError,
    SourceConfig,
};
pub use dates::{parse_date_index, DateIndex, PayloadError};
pub use observability::{
    init_logging, log_app_start, log_page_written, log_source_selected, logging_config_from_env,
    logging_config_from_lookup, LogFormat, LoggingConfig, LoggingInitError,
};
pub use page::{
    status_dates_failed, status_loading_snapshot, status_snapshot_failed, status_snapshot_loaded,
    CategoryArea, CategoryBody, CategoryView, DateOption, PageState, RenderedItem,
    NO_CATEGORIES_PLACEHOLDER, NO_ITEMS_PLACEHOLDER, STATUS_LOADING_DATES, STATUS_NO_DATES,
};
pub use render::{
    escape_attr, escape_text, render_category_area, render_category_section, render_date_options,
    render_empty_placeholder, render_item, render_item_list, render_page_html,
};
pub use snapshot::{
    parse_snapshot, resolve_categories, snapshot_path, Category, CategoryPolicy, FixedCategory,
    NewsItem, Snapshot, DEFAULT_RESERVED_KEY,
};
pub use source::{
    cache_busted_url, join_url, CacheBust, DirSource, FetchError, HttpSource, HttpSourceConfig,
    ResourceSource,
};
pub use viewer::{LoadError, LoadOutcome, Viewer, ViewerConfig};
