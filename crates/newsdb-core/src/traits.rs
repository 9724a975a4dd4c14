use async_trait::async_trait;

use crate::types::ArticleRecord;

/// Encodes text into the vector space of the stored article embeddings.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for query"))
    }
}

/// Backing store of scraped articles.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Most recent articles with non-blank body text first; rows without a
    /// publication date come after all dated rows. Blank rows are filtered
    /// before the cut, so they never take one of the `limit` slots.
    async fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<ArticleRecord>>;

    async fn count(&self) -> anyhow::Result<usize>;
}

/// External text-generation service used to phrase answers.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, question: &str) -> anyhow::Result<String>;
}
