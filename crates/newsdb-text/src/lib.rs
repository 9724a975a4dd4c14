//! newsdb-text
//!
//! Lexical side of the hybrid search: an in-RAM tantivy BM25 index over the
//! article corpus, tokenized by lowercase + whitespace split on both the
//! indexing and the query side.
pub mod index;
pub mod tantivy_utils;

pub use index::{score_optional, LexicalIndex};

use tantivy::tokenizer::{Token, TokenStream};

/// Query tokenizer. Runs the analyzer the index is built with.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut analyzer = tantivy_utils::analyzer();
	let mut stream = analyzer.token_stream(text);
	let mut tokens = Vec::new();
	stream.process(&mut |token: &Token| tokens.push(token.text.clone()));
	tokens
}
