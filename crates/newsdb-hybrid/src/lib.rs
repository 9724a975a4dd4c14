//! newsdb-hybrid
//!
//! Hybrid retrieval over a news corpus: lexical BM25, cosine similarity over
//! stored article vectors and a category recency boost, served from an
//! atomically swapped corpus snapshot.
pub mod answer;
pub mod ranker;
pub mod session;
pub mod snapshot;

pub use answer::{build_context, system_prompt, Answer, AnswerContext, SourceRef, NO_ARTICLES_MESSAGE, NO_INFORMATION_MESSAGE};
pub use ranker::rank;
pub use session::{RetrievalSession, SessionStats, SessionStatus};
pub use snapshot::CorpusSnapshot;
