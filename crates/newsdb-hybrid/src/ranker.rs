//! Merges the lexical, semantic and category stages into one ranked list.
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use newsdb_core::category::{classify, latest_in_category};
use newsdb_core::types::{Document, RankedDocument, SourceKind};
use newsdb_text::{score_optional, tokenize};
use newsdb_vector::rank_by_similarity;

use crate::snapshot::CorpusSnapshot;

struct Merged {
    seen: HashSet<String>,
    out: Vec<RankedDocument>,
}

impl Merged {
    fn push(&mut self, document: &Arc<Document>, score: f32, source: SourceKind) {
        if self.seen.insert(document.id.clone()) {
            self.out.push(RankedDocument { document: Arc::clone(document), score, source });
        }
    }
}

/// Rank `snapshot` for `query`, at most `k` results with unique ids.
///
/// Order: lexical top `k`, then semantic top `k` when `query_vector` is
/// given, then the newest `k` articles of the detected category. Each stage
/// only appends ids not seen before.
pub fn rank(query: &str, query_vector: Option<&[f32]>, snapshot: &CorpusSnapshot, k: usize) -> Result<Vec<RankedDocument>> {
    if k == 0 || snapshot.is_empty() { return Ok(Vec::new()); }
    let docs = &snapshot.documents;
    let mut merged = Merged { seen: HashSet::new(), out: Vec::new() };

    let lexical = score_optional(snapshot.lexical.as_ref(), &tokenize(query), k)?;
    for &(position, score) in &lexical {
        merged.push(&docs[position], score, SourceKind::Text);
    }

    let semantic = query_vector.map(|v| rank_by_similarity(v, &snapshot.embeddings, docs, k)).unwrap_or_default();
    for &(position, score) in &semantic {
        merged.push(&docs[position], score, SourceKind::Vector);
    }

    let category = classify(query);
    if let Some(category) = category {
        for document in latest_in_category(docs, category, k) {
            merged.push(document, 0.0, SourceKind::Category);
        }
    }
    tracing::debug!(lexical = lexical.len(), semantic = semantic.len(), ?category, "ranking stages");

    let mut out = merged.out;
    out.truncate(k);
    Ok(out)
}
