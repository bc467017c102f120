//! Per-date snapshot payloads and category resolution.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::dates::PayloadError;

pub const DEFAULT_RESERVED_KEY: &str = "date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCategory {
    pub key: String,
    pub label: String,
}

impl FixedCategory {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryPolicy {
    /// Every payload key except the reserved date stamp, in payload order.
    Dynamic { reserved_key: String },
    /// A pre-declared list, in declared order.
    Fixed(Vec<FixedCategory>),
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self::Dynamic {
            reserved_key: DEFAULT_RESERVED_KEY.to_string(),
        }
    }
}

/// Declared categories with repeated keys dropped; the first declaration wins.
pub(crate) fn distinct_fixed(fixed: &[FixedCategory]) -> Vec<&FixedCategory> {
    let mut seen = HashSet::new();
    fixed
        .iter()
        .filter(|&entry| seen.insert(entry.key.as_str()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub label: String,
    /// `None` when the key is absent, null, or not an array.
    pub items: Option<Vec<NewsItem>>,
}

impl Category {
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub date_id: String,
    pub categories: Vec<Category>,
}

pub fn snapshot_path(prefix: &str, date_id: &str, suffix: &str) -> String {
    format!("{prefix}{date_id}{suffix}")
}

pub fn parse_snapshot(
    date_id: &str,
    bytes: &[u8],
    policy: &CategoryPolicy,
) -> Result<Snapshot, PayloadError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(payload) = value else {
        return Err(PayloadError::UnexpectedShape(
            "snapshot must be a JSON object".to_string(),
        ));
    };

    Ok(Snapshot {
        date_id: date_id.to_string(),
        categories: resolve_categories(&payload, policy),
    })
}

pub fn resolve_categories(payload: &Map<String, Value>, policy: &CategoryPolicy) -> Vec<Category> {
    match policy {
        CategoryPolicy::Dynamic { reserved_key } => payload
            .iter()
            .filter(|(key, _)| *key != reserved_key)
            .map(|(key, value)| Category {
                name: key.clone(),
                label: key.clone(),
                items: items_from_value(key, value),
            })
            .collect(),
        CategoryPolicy::Fixed(fixed) => distinct_fixed(fixed)
            .into_iter()
            .map(|entry| Category {
                name: entry.key.clone(),
                label: entry.label.clone(),
                items: payload
                    .get(&entry.key)
                    .and_then(|value| items_from_value(&entry.key, value)),
            })
            .collect(),
    }
}

fn items_from_value(category: &str, value: &Value) -> Option<Vec<NewsItem>> {
    match value {
        Value::Array(entries) => Some(
            entries
                .iter()
                .filter_map(|entry| {
                    let item = entry.as_object().map(item_from_object);
                    if item.is_none() {
                        debug!(
                            component = "snapshot",
                            event = "snapshot.item.skipped",
                            category,
                            "non-object entry in item list"
                        );
                    }
                    item
                })
                .collect(),
        ),
        Value::Null => None,
        _ => {
            debug!(
                component = "snapshot",
                event = "snapshot.category.not_a_list",
                category
            );
            None
        }
    }
}

fn item_from_object(entry: &Map<String, Value>) -> NewsItem {
    let text = |key: &str| match entry.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        _ => String::new(),
    };
    NewsItem {
        title: text("title"),
        link: text("link"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "date": "2025-11-18",
        "今日头条热榜": [{"title": "t1", "link": "https://t/1"}],
        "BBC中文网热点": [{"title": "b1", "link": "https://b/1"}, {"title": "b2", "link": "https://b/2"}],
        "百度热搜": []
    }"#;

    #[test]
    fn dynamic_policy_keeps_payload_order_and_skips_reserved_key() {
        let snapshot =
            parse_snapshot("2025-11-18", PAYLOAD.as_bytes(), &CategoryPolicy::default()).unwrap();
        let names: Vec<&str> = snapshot
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();

        assert_eq!(names, vec!["今日头条热榜", "BBC中文网热点", "百度热搜"]);
        assert_eq!(snapshot.categories[1].item_count(), 2);
        assert_eq!(snapshot.categories[2].items, Some(Vec::new()));
    }

    #[test]
    fn fixed_policy_uses_declared_order_and_labels() {
        let policy = CategoryPolicy::Fixed(vec![
            FixedCategory::new("BBC中文网热点", "BBC"),
            FixedCategory::new("百度热搜", "Baidu"),
            FixedCategory::new("missing", "Missing"),
        ]);
        let snapshot = parse_snapshot("2025-11-18", PAYLOAD.as_bytes(), &policy).unwrap();

        assert_eq!(snapshot.categories.len(), 3);
        assert_eq!(snapshot.categories[0].label, "BBC");
        assert_eq!(snapshot.categories[0].items.as_ref().unwrap()[1].title, "b2");
        assert_eq!(snapshot.categories[2].items, None);
    }

    #[test]
    fn repeated_fixed_key_renders_once_with_first_label() {
        let policy = CategoryPolicy::Fixed(vec![
            FixedCategory::new("BBC中文网热点", "BBC"),
            FixedCategory::new("百度热搜", "Baidu"),
            FixedCategory::new("BBC中文网热点", "BBC again"),
        ]);
        let snapshot = parse_snapshot("2025-11-18", PAYLOAD.as_bytes(), &policy).unwrap();

        let labels: Vec<&str> = snapshot
            .categories
            .iter()
            .map(|category| category.label.as_str())
            .collect();
        assert_eq!(labels, vec!["BBC", "Baidu"]);
    }

    #[test]
    fn only_reserved_key_yields_no_categories() {
        let snapshot = parse_snapshot(
            "2025-11-18",
            br#"{"date":"2025-11-18"}"#,
            &CategoryPolicy::default(),
        )
        .unwrap();
        assert!(snapshot.categories.is_empty());
    }

    #[test]
    fn lenient_item_parsing() {
        let snapshot = parse_snapshot(
            "d",
            br#"{"news":[{"title":"only title"},"garbage",{"link":"https://x","extra":1}],"odd":"text","gone":null}"#,
            &CategoryPolicy::default(),
        )
        .unwrap();

        let news = snapshot.categories[0].items.as_ref().unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0], NewsItem::new("only title", ""));
        assert_eq!(news[1], NewsItem::new("", "https://x"));
        assert_eq!(snapshot.categories[1].items, None);
        assert_eq!(snapshot.categories[2].items, None);
    }

    #[test]
    fn scalar_titles_and_links_keep_their_text() {
        let snapshot = parse_snapshot(
            "d",
            br#"{"rank":[{"title":123,"link":"l"},{"title":true,"link":4.5},{"title":null,"link":["x"]}]}"#,
            &CategoryPolicy::default(),
        )
        .unwrap();

        let items = snapshot.categories[0].items.as_ref().unwrap();
        assert_eq!(items[0], NewsItem::new("123", "l"));
        assert_eq!(items[1], NewsItem::new("true", "4.5"));
        assert_eq!(items[2], NewsItem::new("", ""));
    }

    #[test]
    fn non_object_payload_is_unexpected_shape() {
        assert!(matches!(
            parse_snapshot("d", b"[1,2]", &CategoryPolicy::default()),
            Err(PayloadError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_snapshot("d", b"<html>", &CategoryPolicy::default()),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn snapshot_path_joins_parts() {
        assert_eq!(
            snapshot_path("data/NewsPage-", "2025-11-18", ".json"),
            "data/NewsPage-2025-11-18.json"
        );
    }
}
