use anyhow::Result;
use arrow_array::types::Float32Type;
use arrow_array::{ListArray, RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use lancedb::Connection;
use std::collections::HashMap;
use std::sync::Arc;

use newsdb_core::types::ArticleRecord;

use crate::schema::build_articles_schema;
use crate::table::{ensure_articles_table, open_db};

/// Stable article id for rows that arrive without one.
pub fn article_id_for_url(url: &str) -> String {
	blake3::hash(url.trim().as_bytes()).to_hex()[..16].to_string()
}

/// Writes scraped articles into the LanceDB `articles` table. Rows are
/// upserted by URL, which is unique per article.
pub struct ArticleWriter { db: Connection, table_name: String }

impl ArticleWriter {
	pub async fn new(db_uri: &str, table_name: &str) -> Result<Self> {
		let db = open_db(db_uri).await?;
		Ok(Self { db, table_name: table_name.to_string() })
	}

	/// Returns the number of rows written. Rows without a URL are skipped;
	/// within one call the last row for a URL wins.
	pub async fn upsert(&self, records: &[ArticleRecord]) -> Result<usize> {
		let mut by_url: HashMap<String, usize> = HashMap::new();
		let mut rows: Vec<ArticleRecord> = Vec::new();
		for r in records {
			let Some(url) = r.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
				tracing::warn!(id = %r.id, "skipping article without url");
				continue;
			};
			let mut row = r.clone();
			if row.id.trim().is_empty() { row.id = article_id_for_url(url); }
			match by_url.get(url) {
				Some(&i) => rows[i] = row,
				None => { by_url.insert(url.to_string(), rows.len()); rows.push(row); }
			}
		}
		if rows.is_empty() { return Ok(0); }

		ensure_articles_table(&self.db, &self.table_name).await?;
		let batch = records_to_batch(&rows)?;
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), build_articles_schema()));
		let table = self.db.open_table(&self.table_name).execute().await?;
		let mut mi = table.merge_insert(&["url"]);
		mi.when_matched_update_all(None).when_not_matched_insert_all();
		let _ = mi.execute(reader).await?;
		tracing::info!(rows = rows.len(), table = %self.table_name, "articles upserted");
		Ok(rows.len())
	}
}

pub fn records_to_batch(records: &[ArticleRecord]) -> Result<RecordBatch> {
	let millis = |dt: &Option<chrono::DateTime<chrono::Utc>>| dt.as_ref().map(chrono::DateTime::timestamp_millis);
	let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
	let titles: Vec<Option<String>> = records.iter().map(|r| r.title.clone()).collect();
	let texts: Vec<Option<String>> = records.iter().map(|r| r.text.clone()).collect();
	let categories: Vec<Option<String>> = records.iter().map(|r| r.category.clone()).collect();
	let sources: Vec<Option<String>> = records.iter().map(|r| r.source.clone()).collect();
	let urls: Vec<Option<String>> = records.iter().map(|r| r.url.clone()).collect();
	let published: Vec<Option<i64>> = records.iter().map(|r| millis(&r.published_at)).collect();
	let scraped: Vec<Option<i64>> = records.iter().map(|r| millis(&r.scraped_at)).collect();
	let vectors: Vec<Option<Vec<Option<f32>>>> = records.iter().map(|r| r.embedding.clone()).collect();
	let batch = RecordBatch::try_new(build_articles_schema(), vec![
		Arc::new(StringArray::from(ids)),
		Arc::new(StringArray::from(titles)),
		Arc::new(StringArray::from(texts)),
		Arc::new(StringArray::from(categories)),
		Arc::new(StringArray::from(sources)),
		Arc::new(StringArray::from(urls)),
		Arc::new(TimestampMillisecondArray::from(published)),
		Arc::new(TimestampMillisecondArray::from(scraped)),
		Arc::new(ListArray::from_iter_primitive::<Float32Type, _, _>(vectors)),
	])?;
	Ok(batch)
}
