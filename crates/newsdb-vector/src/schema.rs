use arrow_schema::{DataType, Field, Schema, TimeUnit};
use std::sync::Arc;

/// Stored vectors are a variable-length list so rows written by an older
/// encoder (other dimensionality) stay readable.
pub fn build_articles_schema() -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("id", DataType::Utf8, false),
		Field::new("title", DataType::Utf8, true),
		Field::new("text", DataType::Utf8, true),
		Field::new("category", DataType::Utf8, true),
		Field::new("source", DataType::Utf8, true),
		Field::new("url", DataType::Utf8, true),
		Field::new("published_at", DataType::Timestamp(TimeUnit::Millisecond, None), true),
		Field::new("scraped_at", DataType::Timestamp(TimeUnit::Millisecond, None), true),
		Field::new("embedding", DataType::List(Arc::new(Field::new("item", DataType::Float32, true))), true),
	]))
}
