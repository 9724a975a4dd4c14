//! Cosine ranking over the cached article vectors.
use newsdb_core::types::Document;

use crate::cache::EmbeddingCache;

/// Cosine similarity in `[-1, 1]`. Incomparable pairs (length mismatch,
/// empty, zero magnitude, non-finite elements) score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() { return 0.0; }
    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) { return 0.0; }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { return 0.0; }
    dot / (norm_a * norm_b)
}

/// Top `k` corpus positions by similarity to `query`.
///
/// Documents without a cached vector, or whose vector length differs from
/// the query's, are left out rather than scored zero. Equal similarities are
/// ordered by document id.
pub fn rank_by_similarity<D: AsRef<Document>>(query: &[f32], cache: &EmbeddingCache, documents: &[D], k: usize) -> Vec<(usize, f32)> {
    if k == 0 || query.is_empty() || cache.is_empty() { return Vec::new(); }
    let mut scored: Vec<(usize, f32)> = documents
        .iter()
        .enumerate()
        .filter_map(|(position, d)| {
            let doc: &Document = d.as_ref();
            let vector = cache.get(&doc.id)?;
            (vector.len() == query.len()).then(|| (position, cosine_similarity(query, vector)))
        })
        .collect();
    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1).then_with(|| documents[a.0].as_ref().id.cmp(&documents[b.0].as_ref().id))
    });
    scored.truncate(k);
    scored
}
