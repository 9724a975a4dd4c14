//! Per-article vectors of one corpus, keyed by article id.
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct EmbeddingCache {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, id: impl Into<String>, vector: Vec<f32>) { self.vectors.insert(id.into(), vector); }

    pub fn get(&self, id: &str) -> Option<&[f32]> { self.vectors.get(id).map(Vec::as_slice) }

    pub fn contains(&self, id: &str) -> bool { self.vectors.contains_key(id) }

    pub fn len(&self) -> usize { self.vectors.len() }

    pub fn is_empty(&self) -> bool { self.vectors.is_empty() }

    pub fn ids(&self) -> impl Iterator<Item = &str> { self.vectors.keys().map(String::as_str) }
}
