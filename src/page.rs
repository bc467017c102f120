//! View state for the three shell element roles: status text, date selector, and
//! the category container.

use crate::snapshot::{Category, Snapshot};

pub const STATUS_LOADING_DATES: &str = "Loading date list…";
pub const STATUS_NO_DATES: &str = "No data yet. Waiting for the first scheduled snapshot.";
pub const NO_ITEMS_PLACEHOLDER: &str = "No data";
pub const NO_CATEGORIES_PLACEHOLDER: &str = "No categories in this snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub rank: usize,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryBody {
    Empty,
    Items(Vec<RenderedItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub name: String,
    pub title: String,
    pub collapsed: bool,
    pub body: CategoryBody,
}

impl CategoryView {
    pub fn from_category(category: &Category) -> Self {
        let body = match category.items.as_deref() {
            None | Some([]) => CategoryBody::Empty,
            Some(items) => CategoryBody::Items(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| RenderedItem {
                        rank: idx + 1,
                        title: item.title.clone(),
                        link: item.link.clone(),
                    })
                    .collect(),
            ),
        };

        Self {
            name: category.name.clone(),
            title: category.label.clone(),
            collapsed: false,
            body,
        }
    }

    pub fn placeholder(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            collapsed: false,
            body: CategoryBody::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryArea {
    Cleared,
    /// Uniform "no data" placeholder after a failed load.
    Unavailable,
    NoCategories,
    Sections(Vec<CategoryView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub status: String,
    pub date_options: Vec<DateOption>,
    pub selected_date: Option<String>,
    pub categories: CategoryArea,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            status: String::new(),
            date_options: Vec::new(),
            selected_date: None,
            categories: CategoryArea::Cleared,
        }
    }
}

impl PageState {
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn replace_date_options(&mut self, dates: &[String]) {
        self.date_options = dates
            .iter()
            .map(|date| DateOption {
                value: date.clone(),
                label: date.clone(),
            })
            .collect();
        self.selected_date = dates.first().cloned();
    }

    pub fn clear_categories(&mut self) {
        self.categories = CategoryArea::Cleared;
    }

    pub fn show_snapshot(&mut self, snapshot: &Snapshot) {
        self.categories = if snapshot.categories.is_empty() {
            CategoryArea::NoCategories
        } else {
            CategoryArea::Sections(
                snapshot
                    .categories
                    .iter()
                    .map(CategoryView::from_category)
                    .collect(),
            )
        };
    }

    pub fn sections(&self) -> &[CategoryView] {
        match &self.categories {
            CategoryArea::Sections(sections) => sections,
            _ => &[],
        }
    }

    pub fn section(&self, name: &str) -> Option<&CategoryView> {
        self.sections().iter().find(|section| section.name == name)
    }

    /// Flips the collapsed flag of one section and returns its new value.
    pub fn toggle_category(&mut self, name: &str) -> Option<bool> {
        let CategoryArea::Sections(sections) = &mut self.categories else {
            return None;
        };
        let section = sections.iter_mut().find(|section| section.name == name)?;
        section.collapsed = !section.collapsed;
        Some(section.collapsed)
    }
}

pub fn status_loading_snapshot(date_id: &str) -> String {
    format!("Loading {date_id}…")
}

pub fn status_snapshot_loaded(date_id: &str) -> String {
    format!("Loaded {date_id}.")
}

pub fn status_dates_failed(reason: &str) -> String {
    format!("Failed to load dates: {reason}")
}

pub fn status_snapshot_failed(date_id: &str, reason: &str) -> String {
    format!("Failed to load {date_id}: {reason}")
}
