//! Article store implementations.
//!
//! `lance` is the on-disk store the scraper writes into; `memory` serves
//! fixtures. Both return rows newest first and honor the fetch limit.
pub mod lance;
pub mod memory;

pub use lance::LanceArticleStore;
pub use memory::MemoryArticleStore;
