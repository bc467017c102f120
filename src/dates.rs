//! Date index: the ordered list of snapshot dates, newest first.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateIndex {
    dates: Vec<String>,
}

#[derive(Deserialize)]
struct RawDateIndex {
    #[serde(default)]
    dates: Option<Vec<String>>,
}

impl DateIndex {
    pub fn new(dates: Vec<String>) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn newest(&self) -> Option<&str> {
        self.dates.first().map(String::as_str)
    }

    pub fn contains(&self, date_id: &str) -> bool {
        self.dates.iter().any(|date| date == date_id)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
}

/// Parses `{"dates": [...]}`. A missing or null `dates` field is an empty index.
pub fn parse_date_index(bytes: &[u8]) -> Result<DateIndex, PayloadError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(PayloadError::UnexpectedShape(
            "date index must be a JSON object".to_string(),
        ));
    }

    let raw: RawDateIndex = serde_json::from_value(value)
        .map_err(|err| PayloadError::UnexpectedShape(format!("dates: {err}")))?;

    Ok(DateIndex::new(raw.dates.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_index_order() {
        let index =
            parse_date_index(br#"{"dates":["2025-11-20","2025-11-19","2025-11-18"]}"#).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.newest(), Some("2025-11-20"));
        assert_eq!(index.dates()[2], "2025-11-18");
    }

    #[test]
    fn missing_or_null_dates_is_empty_not_error() {
        assert!(parse_date_index(b"{}").unwrap().is_empty());
        assert!(parse_date_index(br#"{"dates":null}"#).unwrap().is_empty());
        assert!(parse_date_index(br#"{"dates":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            parse_date_index(b"not json"),
            Err(PayloadError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_date_index(br#"["2025-11-20"]"#),
            Err(PayloadError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_date_index(br#"{"dates":"2025-11-20"}"#),
            Err(PayloadError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_date_index(br#"{"dates":[20251120]}"#),
            Err(PayloadError::UnexpectedShape(_))
        ));
    }
}
