use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED};
use tantivy::tokenizer::{LowerCaser, TextAnalyzer, WhitespaceTokenizer};
use tantivy::Index;

pub const TOKENIZER_NAME: &str = "news_whitespace_lower";
pub const CONTENT_FIELD: &str = "content";
pub const POSITION_FIELD: &str = "position";

/// `content` holds the composite article block; `position` is the
/// document's index in the corpus it was built from.
pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let content_indexing = TextFieldIndexing::default().set_tokenizer(TOKENIZER_NAME).set_index_option(IndexRecordOption::WithFreqs);
	let _content_field = schema_builder.add_text_field(CONTENT_FIELD, TextOptions::default().set_indexing_options(content_indexing));
	let _position_field = schema_builder.add_u64_field(POSITION_FIELD, STORED);
	schema_builder.build()
}

/// Lowercase + whitespace split, no stemming and no stopwords. Used for both
/// indexing and query tokenization.
pub fn analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(WhitespaceTokenizer::default())
		.filter(LowerCaser)
		.build()
}

pub fn register_tokenizer(index: &Index) {
	index.tokenizers().register(TOKENIZER_NAME, analyzer());
}
