//! In-process article store for fixtures, tests and offline demos.
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use newsdb_core::article::{has_body, order_by_recency};
use newsdb_core::traits::ArticleStore;
use newsdb_core::types::ArticleRecord;

use crate::writer::article_id_for_url;

#[derive(Default)]
pub struct MemoryArticleStore {
    records: RwLock<Vec<ArticleRecord>>,
    offline: AtomicBool,
}

impl MemoryArticleStore {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        let store = Self::default();
        store.upsert(records);
        store
    }

    /// Insert or replace by URL; rows without a URL are keyed by id.
    pub fn upsert(&self, records: impl IntoIterator<Item = ArticleRecord>) {
        let mut guard = self.records.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        for mut record in records {
            if record.id.is_empty() {
                if let Some(url) = record.url.as_deref() { record.id = article_id_for_url(url); }
            }
            let existing = guard.iter().position(|r| match (&r.url, &record.url) {
                (Some(a), Some(b)) => a.trim() == b.trim(),
                _ => r.id == record.id,
            });
            match existing {
                Some(i) => guard[i] = record,
                None => guard.push(record),
            }
        }
    }

    /// Simulate an unreachable backing store.
    pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst); }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) { bail!("article store is unreachable"); }
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ArticleRecord>> {
        self.ensure_online()?;
        let mut records: Vec<ArticleRecord> = self
            .records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|r| has_body(r))
            .cloned()
            .collect();
        order_by_recency(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    async fn count(&self) -> Result<usize> {
        self.ensure_online()?;
        Ok(self.records.read().unwrap_or_else(std::sync::PoisonError::into_inner).len())
    }
}
