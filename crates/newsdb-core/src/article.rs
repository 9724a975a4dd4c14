//! Turning raw store rows into corpus documents.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

use crate::error::Error;
use crate::types::{ArticleRecord, Document};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const UNKNOWN_DATE: &str = "N/A";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_SOURCE: &str = "Unknown";

pub fn format_date(published_at: Option<&DateTime<Utc>>) -> String {
    published_at.map_or_else(|| UNKNOWN_DATE.to_string(), |dt| dt.format(DATE_FORMAT).to_string())
}

/// Parse a `YYYY-MM-DD` document date; `N/A` and garbage yield `None`.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

/// The composite block indexed lexically and shown to the answer service.
pub fn compose_content(title: &str, category: &str, date: &str, source: &str, text: &str) -> String {
    format!("Title: {title}\nCategory: {category}\nDate: {date}\nSource: {source}\nContent: {text}")
}

fn trimmed_or(value: Option<&String>, default: &str) -> String {
    match value.map(|s| s.trim()) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// True when the row has a non-blank body; blank rows never enter the corpus.
pub fn has_body(record: &ArticleRecord) -> bool {
    record.text.as_deref().is_some_and(|t| !t.trim().is_empty())
}

impl From<&ArticleRecord> for Document {
    fn from(record: &ArticleRecord) -> Self {
        let title = trimmed_or(record.title.as_ref(), "");
        let text = trimmed_or(record.text.as_ref(), "");
        let category = trimmed_or(record.category.as_ref(), DEFAULT_CATEGORY);
        let source = trimmed_or(record.source.as_ref(), DEFAULT_SOURCE);
        let url = trimmed_or(record.url.as_ref(), "");
        let published_date = format_date(record.published_at.as_ref());
        let content = compose_content(&title, &category, &published_date, &source, &text);
        Self { id: record.id.clone(), title, category, published_date, source, url, content }
    }
}

/// Validate a stored vector. `Ok(None)` when the row has no vector at all.
pub fn parse_embedding(record: &ArticleRecord) -> crate::error::Result<Option<Vec<f32>>> {
    let Some(raw) = record.embedding.as_ref() else { return Ok(None) };
    let malformed = |reason: String| Error::MalformedVector { id: record.id.clone(), reason };
    if raw.is_empty() {
        return Err(malformed("vector is empty".to_string()));
    }
    raw.iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if x.is_finite() => Ok(*x),
            Some(x) => Err(malformed(format!("element {i} is not finite ({x})"))),
            None => Err(malformed(format!("element {i} is null"))),
        })
        .collect::<crate::error::Result<Vec<f32>>>()
        .map(Some)
}

/// Newest first, undated rows last; stable for equal dates.
pub fn order_by_recency(records: &mut [ArticleRecord]) {
    records.sort_by(|a, b| match (&a.published_at, &b.published_at) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
