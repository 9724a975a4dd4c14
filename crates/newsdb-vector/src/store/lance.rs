//! LanceDB-backed article store.
//!
//! The table is scanned in full, rows without body text are dropped and the
//! rest ordered client side: newest `published_at` first, undated rows last.
use anyhow::{anyhow, Result};
use arrow_array::cast::AsArray;
use arrow_array::types::Float32Type;
use arrow_array::{Array, ArrayRef, RecordBatch, StringArray, TimestampMillisecondArray};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use lancedb::query::ExecutableQuery;
use lancedb::Connection;

use newsdb_core::article::{has_body, order_by_recency};
use newsdb_core::traits::ArticleStore;
use newsdb_core::types::ArticleRecord;

use crate::table::{open_db, table_exists};

pub struct LanceArticleStore { db: Connection, table_name: String }

impl LanceArticleStore {
    pub async fn open(db_uri: &str, table_name: &str) -> Result<Self> {
        let db = open_db(db_uri).await?;
        Ok(Self { db, table_name: table_name.to_string() })
    }

    async fn scan(&self) -> Result<Vec<ArticleRecord>> {
        if !table_exists(&self.db, &self.table_name).await? {
            tracing::warn!(table = %self.table_name, "articles table does not exist yet");
            return Ok(Vec::new());
        }
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table.query().execute().await?;
        let mut records = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            records.extend(batch_to_records(&batch)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ArticleStore for LanceArticleStore {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<ArticleRecord>> {
        let mut records = self.scan().await?;
        records.retain(has_body);
        order_by_recency(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    async fn count(&self) -> Result<usize> {
        if !table_exists(&self.db, &self.table_name).await? { return Ok(0); }
        let table = self.db.open_table(&self.table_name).execute().await?;
        Ok(table.count_rows(None).await?)
    }
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow!("articles.{name} column missing or not utf8"))
}

fn optional_col<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Option<&'a T> {
    batch.column_by_name(name).and_then(|c| c.as_any().downcast_ref::<T>())
}

fn opt_string(col: Option<&StringArray>, i: usize) -> Option<String> {
    col.filter(|c| !c.is_null(i)).map(|c| c.value(i).to_string())
}

fn opt_timestamp(col: Option<&TimestampMillisecondArray>, i: usize) -> Option<DateTime<Utc>> {
    col.filter(|c| !c.is_null(i)).and_then(|c| DateTime::from_timestamp_millis(c.value(i)))
}

/// Elements of a stored vector. A non-f32 element type yields an empty
/// vector, which the loader rejects as malformed.
fn vector_values(values: &ArrayRef) -> Vec<Option<f32>> {
    values.as_primitive_opt::<Float32Type>().map(|p| p.iter().collect()).unwrap_or_default()
}

fn opt_vector(col: Option<&ArrayRef>, i: usize) -> Option<Vec<Option<f32>>> {
    let col = col?;
    if col.is_null(i) { return None; }
    if let Some(list) = col.as_list_opt::<i32>() {
        return Some(vector_values(&list.value(i)));
    }
    if let Some(list) = col.as_fixed_size_list_opt() {
        return Some(vector_values(&list.value(i)));
    }
    Some(Vec::new())
}

pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<ArticleRecord>> {
    let ids = string_col(batch, "id")?;
    let titles = optional_col::<StringArray>(batch, "title");
    let texts = optional_col::<StringArray>(batch, "text");
    let categories = optional_col::<StringArray>(batch, "category");
    let sources = optional_col::<StringArray>(batch, "source");
    let urls = optional_col::<StringArray>(batch, "url");
    let published = optional_col::<TimestampMillisecondArray>(batch, "published_at");
    let scraped = optional_col::<TimestampMillisecondArray>(batch, "scraped_at");
    let embeddings = batch.column_by_name("embedding");

    Ok((0..batch.num_rows())
        .map(|i| ArticleRecord {
            id: ids.value(i).to_string(),
            title: opt_string(titles, i),
            text: opt_string(texts, i),
            category: opt_string(categories, i),
            source: opt_string(sources, i),
            url: opt_string(urls, i),
            published_at: opt_timestamp(published, i),
            scraped_at: opt_timestamp(scraped, i),
            embedding: opt_vector(embeddings, i),
        })
        .collect())
}
