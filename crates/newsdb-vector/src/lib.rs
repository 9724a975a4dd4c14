//! newsdb-vector
//!
//! Article storage (LanceDB and in-memory), the corpus loader and the
//! cosine ranking over precomputed article vectors.
pub mod cache;
pub mod loader;
pub mod schema;
pub mod search;
pub mod store;
pub mod table;
pub mod writer;

pub use cache::EmbeddingCache;
pub use loader::{load_corpus, LoadedCorpus, DEFAULT_LOAD_LIMIT};
pub use search::{cosine_similarity, rank_by_similarity};
pub use store::{LanceArticleStore, MemoryArticleStore};
pub use writer::{article_id_for_url, ArticleWriter};
