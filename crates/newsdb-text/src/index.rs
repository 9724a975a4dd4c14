use anyhow::Result;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};

use newsdb_core::types::Document;

use crate::tantivy_utils::{build_schema, register_tokenizer, CONTENT_FIELD, POSITION_FIELD};

const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// In-RAM BM25 index over the `content` of one corpus.
///
/// Built once per corpus and never updated; a new corpus gets a new index.
pub struct LexicalIndex {
	searcher: Searcher,
	content_field: Field,
	position_field: Field,
	num_docs: usize,
}

impl LexicalIndex {
	/// `None` for an empty corpus: there is nothing to score against.
	pub fn build<D: AsRef<Document>>(documents: &[D]) -> Result<Option<Self>> {
		if documents.is_empty() { return Ok(None); }
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let content_field = schema.get_field(CONTENT_FIELD)?;
		let position_field = schema.get_field(POSITION_FIELD)?;

		let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
		for (position, d) in documents.iter().enumerate() {
			let document: &Document = d.as_ref();
			writer.add_document(doc!(
				content_field => document.content.as_str(),
				position_field => position as u64,
			))?;
		}
		writer.commit()?;

		let reader: IndexReader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		reader.reload()?;
		let searcher = reader.searcher();
		let num_docs = usize::try_from(searcher.num_docs())?;
		tracing::debug!(num_docs, "lexical index built");
		Ok(Some(Self { searcher, content_field, position_field, num_docs }))
	}

	pub fn len(&self) -> usize { self.num_docs }

	pub fn is_empty(&self) -> bool { self.num_docs == 0 }

	/// Corpus positions of documents sharing at least one token with the
	/// query, best first, ties by position. At most `limit` entries.
	pub fn score(&self, tokens: &[String], limit: usize) -> Result<Vec<(usize, f32)>> {
		if tokens.is_empty() || limit == 0 { return Ok(Vec::new()); }
		let clauses: Vec<(Occur, Box<dyn Query>)> = tokens
			.iter()
			.map(|t| {
				let term = Term::from_field_text(self.content_field, t);
				(Occur::Should, Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>)
			})
			.collect();
		let query = BooleanQuery::new(clauses);
		// Collect every match so equal scores can be ordered by position.
		let top_docs = self.searcher.search(&query, &TopDocs::with_limit(self.num_docs.max(1)))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let stored: TantivyDocument = self.searcher.doc(addr)?;
			let position = stored
				.get_first(self.position_field)
				.and_then(|v| v.as_u64())
				.ok_or_else(|| anyhow::anyhow!("indexed document without position"))?;
			hits.push((usize::try_from(position)?, score));
		}
		hits.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
		hits.truncate(limit);
		Ok(hits)
	}
}

/// Scores against an absent index are empty, not an error.
pub fn score_optional(index: Option<&LexicalIndex>, tokens: &[String], limit: usize) -> Result<Vec<(usize, f32)>> {
	match index {
		Some(index) => index.score(tokens, limit),
		None => Ok(Vec::new()),
	}
}
