//! Domain types shared by the store, the engines and the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type ArticleId = String;

/// A raw article row as handed over by a store.
///
/// - `embedding`: precomputed vector; `None` when the article was never
///   embedded. A `None` element or a non-finite element marks the vector as
///   malformed (see `article::parse_embedding`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleRecord {
    #[serde(default)]
    pub id: ArticleId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub embedding: Option<Vec<Option<f32>>>,
}

/// An article as held by the in-memory corpus.
///
/// `content` is the composite block used both for display and for lexical
/// indexing. `published_date` is `YYYY-MM-DD` or `N/A`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: ArticleId,
    pub title: String,
    pub category: String,
    pub published_date: String,
    pub source: String,
    pub url: String,
    pub content: String,
}

impl AsRef<Document> for Document {
    fn as_ref(&self) -> &Document {
        self
    }
}

/// Which retrieval stage contributed a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Vector,
    Category,
}

/// One entry of a ranked retrieval result.
///
/// `score` is stage-specific (BM25 for `Text`, cosine for `Vector`, `0.0`
/// for `Category`); only the order of the result list is meaningful across
/// stages.
#[derive(Debug, Clone)]
pub struct RankedDocument {
    pub document: Arc<Document>,
    pub score: f32,
    pub source: SourceKind,
}

impl RankedDocument {
    pub fn id(&self) -> &str {
        &self.document.id
    }
}
