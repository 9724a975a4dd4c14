//! Retrieval session: owns the published corpus snapshot and answers
//! queries against it.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tokio::time::timeout;

use newsdb_core::config::RetrievalSettings;
use newsdb_core::error::{Error, Result};
use newsdb_core::traits::{AnswerGenerator, ArticleStore, Embedder};
use newsdb_core::types::RankedDocument;
use newsdb_vector::load_corpus;

use crate::answer::{build_context, system_prompt, Answer, AnswerContext, NO_ARTICLES_MESSAGE, NO_INFORMATION_MESSAGE};
use crate::ranker::rank;
use crate::snapshot::CorpusSnapshot;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total_articles: usize,
    pub with_embeddings: usize,
    pub categories: BTreeMap<String, usize>,
    pub status: SessionStatus,
    pub loaded_at: DateTime<Utc>,
}

/// Shared as `Arc<RetrievalSession>`. Readers never block on a refresh: they
/// clone the current snapshot pointer and work on it.
pub struct RetrievalSession {
    store: Arc<dyn ArticleStore>,
    embedder: Arc<dyn Embedder>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    settings: RetrievalSettings,
    current: RwLock<Arc<CorpusSnapshot>>,
    initialized: AtomicBool,
    refresh_lock: Mutex<()>,
}

impl RetrievalSession {
    pub fn new(store: Arc<dyn ArticleStore>, embedder: Arc<dyn Embedder>, settings: RetrievalSettings) -> Self {
        Self {
            store,
            embedder,
            generator: None,
            settings,
            current: RwLock::new(Arc::new(CorpusSnapshot::empty())),
            initialized: AtomicBool::new(false),
            refresh_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn settings(&self) -> &RetrievalSettings { &self.settings }

    /// Load and publish the first snapshot. An unreachable store leaves the
    /// session empty but usable. Later calls return the current size.
    pub async fn initialize(&self) -> usize {
        let _guard = self.refresh_lock.lock().await;
        if self.initialized.load(Ordering::SeqCst) { return self.snapshot().len(); }
        let snapshot = match self.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("starting with an empty corpus: {e}");
                CorpusSnapshot::empty()
            }
        };
        let len = self.publish(snapshot);
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(documents = len, "retrieval session initialized");
        len
    }

    /// Replace the snapshot with a freshly loaded one. On failure the
    /// previous snapshot stays published.
    pub async fn refresh(&self) -> Result<usize> {
        let _guard = self.refresh_lock.lock().await;
        let snapshot = self.load_snapshot().await.inspect_err(|e| {
            tracing::warn!("refresh failed, keeping the previous corpus: {e}");
        })?;
        let len = self.publish(snapshot);
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(documents = len, "corpus refreshed");
        Ok(len)
    }

    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RankedDocument>> {
        let snapshot = self.snapshot();
        self.retrieve_from(&snapshot, query, k).await
    }

    pub fn stats(&self) -> SessionStats {
        let snapshot = self.snapshot();
        let mut categories = BTreeMap::new();
        for d in &snapshot.documents {
            *categories.entry(d.category.to_lowercase()).or_insert(0) += 1;
        }
        SessionStats {
            total_articles: snapshot.len(),
            with_embeddings: snapshot.embeddings.len(),
            categories,
            status: if snapshot.is_empty() { SessionStatus::Empty } else { SessionStatus::Active },
            loaded_at: snapshot.loaded_at,
        }
    }

    pub async fn prepare(&self, question: &str) -> Result<AnswerContext> {
        let snapshot = self.snapshot();
        self.prepare_from(&snapshot, question).await
    }

    /// Ground an answer in the top articles for `question`.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let generator = self.generator.as_ref().ok_or(Error::NotConfigured("answer generator"))?;
        let snapshot = self.snapshot();
        if snapshot.is_empty() { return Ok(Answer::without_sources(NO_ARTICLES_MESSAGE)); }
        let prepared = self.prepare_from(&snapshot, question).await?;
        if prepared.articles.is_empty() { return Ok(Answer::without_sources(NO_INFORMATION_MESSAGE)); }
        let response = generator.generate(&system_prompt(&prepared.context), &prepared.question).await?;
        Ok(Answer { response: response.trim().to_string(), sources: prepared.sources() })
    }

    async fn prepare_from(&self, snapshot: &CorpusSnapshot, question: &str) -> Result<AnswerContext> {
        let question = question.trim().to_string();
        let mut articles = self.retrieve_from(snapshot, &question, self.settings.retrieval.top_k).await?;
        articles.truncate(self.settings.retrieval.context_articles);
        let context = build_context(&articles);
        Ok(AnswerContext { question, articles, context })
    }

    async fn retrieve_from(&self, snapshot: &CorpusSnapshot, query: &str, k: usize) -> Result<Vec<RankedDocument>> {
        if k == 0 || snapshot.is_empty() { return Ok(Vec::new()); }
        let query_vector = if snapshot.embeddings.is_empty() { None } else { self.encode_query(query).await? };
        Ok(rank(query, query_vector.as_deref(), snapshot, k)?)
    }

    /// `Ok(None)` when the encoder fails: ranking continues without the
    /// semantic stage. A timeout is an error.
    async fn encode_query(&self, query: &str) -> Result<Option<Vec<f32>>> {
        let embedder = Arc::clone(&self.embedder);
        let text = query.to_string();
        let task = tokio::task::spawn_blocking(move || embedder.embed_query(&text));
        match timeout(self.settings.encoder_timeout(), task).await {
            Err(_) => Err(Error::Unavailable(format!(
                "query encoder timed out after {} ms",
                self.settings.retrieval.encoder_timeout_ms
            ))),
            Ok(Err(e)) => {
                tracing::warn!("query encoder task failed, ranking without vectors: {e}");
                Ok(None)
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!("query encoding failed, ranking without vectors: {e}");
                Ok(None)
            }
            Ok(Ok(Ok(vector))) => Ok(Some(vector)),
        }
    }

    async fn load_snapshot(&self) -> Result<CorpusSnapshot> {
        let load = load_corpus(self.store.as_ref(), self.settings.retrieval.load_limit);
        let corpus = match timeout(self.settings.store_timeout(), load).await {
            Err(_) => {
                return Err(Error::Unavailable(format!(
                    "article store timed out after {} ms",
                    self.settings.retrieval.store_timeout_ms
                )))
            }
            Ok(Err(e)) => return Err(Error::Unavailable(format!("article store unreachable: {e}"))),
            Ok(Ok(corpus)) => corpus,
        };
        let snapshot = tokio::task::spawn_blocking(move || CorpusSnapshot::build(corpus))
            .await
            .map_err(|e| Error::Operation(format!("index build task failed: {e}")))??;
        Ok(snapshot)
    }

    fn publish(&self, snapshot: CorpusSnapshot) -> usize {
        let len = snapshot.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
        len
    }
}
