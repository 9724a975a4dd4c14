//! Pulls a bounded window of articles out of a store and turns it into a
//! corpus plus the vectors that came with it.
use anyhow::Result;
use std::collections::HashSet;

use newsdb_core::article::{has_body, parse_embedding};
use newsdb_core::traits::ArticleStore;
use newsdb_core::types::Document;

use crate::cache::EmbeddingCache;

pub const DEFAULT_LOAD_LIMIT: usize = 1000;

/// Every cache key is the id of one of `documents`.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    pub documents: Vec<Document>,
    pub embeddings: EmbeddingCache,
    pub malformed_vectors: usize,
}

impl LoadedCorpus {
    pub fn empty() -> Self { Self::default() }
}

/// Fails only when the store itself fails. Blank rows and duplicate ids are
/// skipped; a malformed vector drops the vector, never the article.
pub async fn load_corpus(store: &dyn ArticleStore, limit: usize) -> Result<LoadedCorpus> {
    let records = store.fetch_recent(limit).await?;
    let fetched = records.len();
    let mut corpus = LoadedCorpus::empty();
    let mut seen: HashSet<String> = HashSet::with_capacity(fetched);
    for record in &records {
        if !has_body(record) { continue; }
        if !seen.insert(record.id.clone()) {
            tracing::warn!(id = %record.id, "duplicate article id in store, keeping the newest");
            continue;
        }
        match parse_embedding(record) {
            Ok(Some(vector)) => corpus.embeddings.insert(record.id.clone(), vector),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("skipping invalid embedding: {e}");
                corpus.malformed_vectors += 1;
            }
        }
        corpus.documents.push(Document::from(record));
    }
    tracing::info!(
        fetched,
        documents = corpus.documents.len(),
        with_embeddings = corpus.embeddings.len(),
        malformed = corpus.malformed_vectors,
        "corpus loaded"
    );
    Ok(corpus)
}
