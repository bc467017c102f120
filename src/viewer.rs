//! Load orchestration: resolve the date index, then load and render snapshots.
//!
//! Each loadable resource carries its own request generation. A load takes a new
//! token before touching the page and only applies its result if that token is still
//! the latest one when the fetch resolves, so the page always reflects the most
//! recently requested date.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use crate::dates::{parse_date_index, DateIndex, PayloadError};
use crate::observability::{
    log_dates_empty, log_dates_failed, log_dates_finish, log_dates_start, log_dates_superseded,
    log_selection_ignored, log_selection_unknown, log_snapshot_failed, log_snapshot_finish,
    log_snapshot_start, log_snapshot_superseded,
};
use crate::page::{
    status_dates_failed, status_loading_snapshot, status_snapshot_failed, status_snapshot_loaded,
    CategoryArea, CategoryView, PageState, STATUS_LOADING_DATES, STATUS_NO_DATES,
};
use crate::render::render_page_html;
use crate::snapshot::{distinct_fixed, parse_snapshot, snapshot_path, CategoryPolicy, Snapshot};
use crate::source::{FetchError, ResourceSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub index_path: String,
    pub snapshot_prefix: String,
    pub snapshot_suffix: String,
    pub category_policy: CategoryPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            index_path: "data/date.json".to_string(),
            snapshot_prefix: "data/NewsPage-".to_string(),
            snapshot_suffix: ".json".to_string(),
            category_policy: CategoryPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Valid but empty result: no dates, or no displayable categories.
    Empty,
    Failed(String),
    /// A newer request for the same resource was issued before this one resolved.
    Superseded,
    /// A selection arrived before the date index was available.
    Ignored,
}

pub struct Viewer {
    source: Arc<dyn ResourceSource>,
    cfg: ViewerConfig,
    page: Mutex<PageState>,
    index: Mutex<Option<DateIndex>>,
    dates_generation: AtomicU64,
    snapshot_generation: AtomicU64,
    accepting_selection: AtomicBool,
}

impl Viewer {
    pub fn new(source: Arc<dyn ResourceSource>, cfg: ViewerConfig) -> Self {
        Self {
            source,
            cfg,
            page: Mutex::new(PageState::default()),
            index: Mutex::new(None),
            dates_generation: AtomicU64::new(0),
            snapshot_generation: AtomicU64::new(0),
            accepting_selection: AtomicBool::new(false),
        }
    }

    pub fn page(&self) -> PageState {
        self.with_page(|page| page.clone())
    }

    pub fn date_index(&self) -> Option<DateIndex> {
        self.index
            .lock()
            .expect("date index lock should not be poisoned")
            .clone()
    }

    pub fn toggle_category(&self, name: &str) -> Option<bool> {
        self.with_page(|page| page.toggle_category(name))
    }

    pub fn render_html(&self, title: &str) -> String {
        self.with_page(|page| render_page_html(page, title))
    }

    pub async fn load_dates(&self) -> LoadOutcome {
        let token = next_token(&self.dates_generation);
        log_dates_start(&self.cfg.index_path, &self.source.describe(), token);
        self.with_page(|page| page.set_status(STATUS_LOADING_DATES));

        let result = self.fetch_date_index().await;

        let applied = self.apply_if_current(&self.dates_generation, token, |page| match &result {
            Err(err) => {
                log_dates_failed(&self.cfg.index_path, err);
                page.set_status(status_dates_failed(&err.to_string()));
                None
            }
            Ok(index) if index.is_empty() => {
                log_dates_empty();
                page.set_status(STATUS_NO_DATES);
                None
            }
            Ok(index) => {
                page.set_status("");
                page.replace_date_options(index.dates());
                index.newest().map(str::to_string)
            }
        });

        let Some(newest) = applied else {
            log_dates_superseded(token);
            return LoadOutcome::Superseded;
        };

        let index = match result {
            Ok(index) => index,
            Err(err) => return LoadOutcome::Failed(err.to_string()),
        };
        let Some(newest) = newest else {
            return LoadOutcome::Empty;
        };

        log_dates_finish(index.len(), &newest);
        *self
            .index
            .lock()
            .expect("date index lock should not be poisoned") = Some(index);
        self.accepting_selection.store(true, Ordering::SeqCst);

        self.load_snapshot(&newest).await;
        LoadOutcome::Loaded
    }

    /// Change listener for the date selector.
    pub async fn select_date(&self, date_id: &str) -> LoadOutcome {
        if !self.accepting_selection.load(Ordering::SeqCst) {
            log_selection_ignored(date_id);
            return LoadOutcome::Ignored;
        }

        let known = self
            .date_index()
            .map(|index| index.contains(date_id))
            .unwrap_or(false);
        if !known {
            log_selection_unknown(date_id);
        }

        self.with_page(|page| page.selected_date = Some(date_id.to_string()));
        self.load_snapshot(date_id).await
    }

    pub async fn load_snapshot(&self, date_id: &str) -> LoadOutcome {
        let token = next_token(&self.snapshot_generation);
        let path = snapshot_path(&self.cfg.snapshot_prefix, date_id, &self.cfg.snapshot_suffix);
        log_snapshot_start(date_id, &path, token);

        self.with_page(|page| {
            page.set_status(status_loading_snapshot(date_id));
            page.clear_categories();
        });

        let result = self.fetch_snapshot(date_id, &path).await;

        let outcome = self.apply_if_current(&self.snapshot_generation, token, |page| {
            match &result {
                Err(err) => {
                    log_snapshot_failed(date_id, &path, err);
                    page.set_status(status_snapshot_failed(date_id, &err.to_string()));
                    page.categories = self.failure_area();
                    LoadOutcome::Failed(err.to_string())
                }
                Ok(snapshot) => {
                    page.show_snapshot(snapshot);
                    page.set_status(status_snapshot_loaded(date_id));
                    log_snapshot_finish(
                        date_id,
                        snapshot.categories.len(),
                        snapshot
                            .categories
                            .iter()
                            .map(|category| category.item_count())
                            .sum(),
                    );
                    if snapshot.categories.is_empty() {
                        LoadOutcome::Empty
                    } else {
                        LoadOutcome::Loaded
                    }
                }
            }
        });

        outcome.unwrap_or_else(|| {
            log_snapshot_superseded(date_id, token);
            LoadOutcome::Superseded
        })
    }

    async fn fetch_date_index(&self) -> Result<DateIndex, LoadError> {
        let bytes = self.source.fetch(&self.cfg.index_path).await?;
        Ok(parse_date_index(&bytes)?)
    }

    async fn fetch_snapshot(&self, date_id: &str, path: &str) -> Result<Snapshot, LoadError> {
        let bytes = self.source.fetch(path).await?;
        Ok(parse_snapshot(date_id, &bytes, &self.cfg.category_policy)?)
    }

    fn failure_area(&self) -> CategoryArea {
        match &self.cfg.category_policy {
            CategoryPolicy::Dynamic { .. } => CategoryArea::Unavailable,
            CategoryPolicy::Fixed(fixed) => CategoryArea::Sections(
                distinct_fixed(fixed)
                    .into_iter()
                    .map(|entry| CategoryView::placeholder(entry.key.clone(), entry.label.clone()))
                    .collect(),
            ),
        }
    }

    fn with_page<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut guard = self.page.lock().expect("page lock should not be poisoned");
        f(&mut guard)
    }

    /// Runs `f` against the page only while `token` is the latest for `generation`.
    fn apply_if_current<R>(
        &self,
        generation: &AtomicU64,
        token: u64,
        f: impl FnOnce(&mut PageState) -> R,
    ) -> Option<R> {
        let mut guard = self.page.lock().expect("page lock should not be poisoned");
        if generation.load(Ordering::SeqCst) != token {
            return None;
        }
        Some(f(&mut guard))
    }
}

fn next_token(generation: &AtomicU64) -> u64 {
    generation.fetch_add(1, Ordering::SeqCst) + 1
}
