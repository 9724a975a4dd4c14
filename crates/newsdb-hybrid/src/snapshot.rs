//! The immutable corpus triple a retrieval runs against.
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use newsdb_core::types::Document;
use newsdb_text::LexicalIndex;
use newsdb_vector::{EmbeddingCache, LoadedCorpus};

/// Documents, their cached vectors and the lexical index over them.
///
/// Built completely before it is published; never mutated afterwards.
pub struct CorpusSnapshot {
    pub documents: Vec<Arc<Document>>,
    pub embeddings: EmbeddingCache,
    pub lexical: Option<LexicalIndex>,
    pub loaded_at: DateTime<Utc>,
}

impl CorpusSnapshot {
    /// Indexes the loaded documents. CPU bound; run it off the async executor.
    pub fn build(corpus: LoadedCorpus) -> Result<Self> {
        let lexical = LexicalIndex::build(&corpus.documents)?;
        let documents = corpus.documents.into_iter().map(Arc::new).collect();
        Ok(Self { documents, embeddings: corpus.embeddings, lexical, loaded_at: Utc::now() })
    }

    pub fn empty() -> Self {
        Self { documents: Vec::new(), embeddings: EmbeddingCache::new(), lexical: None, loaded_at: Utc::now() }
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}
