//! Process-lifetime embedding cache.
//!
//! Keyed by `(embedder identity, text)` so two differently-identified
//! embedders never share vectors. Reads are lock-free once populated;
//! writes take a brief exclusive lock only to insert.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::interfaces::EmbedderId;

/// A concurrent-read cache from `(embedder, text)` to embedding vector.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<(EmbedderId, String), Vec<f32>>>,
}

impl EmbeddingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a cached embedding for `(embedder, text)`, if present.
    pub fn get(&self, embedder: &EmbedderId, text: &str) -> Option<Vec<f32>> {
        let entries = self.entries.read().expect("embedding cache lock poisoned");
        entries.get(&(embedder.clone(), text.to_string())).cloned()
    }

    /// Inserts or overwrites the cached embedding for `(embedder, text)`.
    pub fn put(&self, embedder: EmbedderId, text: impl Into<String>, embedding: Vec<f32>) {
        let mut entries = self.entries.write().expect("embedding cache lock poisoned");
        entries.insert((embedder, text.into()), embedding);
    }

    /// Number of cached entries, for diagnostics.
    pub fn len(&self) -> usize {
        self.entries.read().expect("embedding cache lock poisoned").len()
    }

    /// True if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty_cache() {
        let cache = EmbeddingCache::new();
        assert!(cache.get(&EmbedderId("a".to_string()), "hello").is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = EmbeddingCache::new();
        let id = EmbedderId("a".to_string());
        cache.put(id.clone(), "hello", vec![1.0, 2.0]);
        assert_eq!(cache.get(&id, "hello"), Some(vec![1.0, 2.0]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_embedders_do_not_share_entries() {
        let cache = EmbeddingCache::new();
        let a = EmbedderId("a".to_string());
        let b = EmbedderId("b".to_string());
        cache.put(a.clone(), "hello", vec![1.0]);
        assert!(cache.get(&b, "hello").is_none());
        assert_eq!(cache.get(&a, "hello"), Some(vec![1.0]));
    }
}
