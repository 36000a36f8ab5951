//! Registry of every distinct word ever observed.
//!
//! The registry owns the canonical `WordEntity` for each word; other stores
//! hold the word string and re-resolve here. Observation is lock-free per
//! shard and safe against concurrent create/increment races.

use std::sync::Arc;

use dashmap::DashMap;

use crate::models::WordEntity;

#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: DashMap<String, Arc<WordEntity>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: DashMap::with_capacity(capacity),
        }
    }

    /// Get or create the entity for `word` and add `amount` to its counter.
    ///
    /// Returns the entity and whether it was newly created. Two workers
    /// racing on the same unseen word converge on one entity; both
    /// increments land on it.
    pub fn observe_by(&self, word: &str, amount: u64) -> (Arc<WordEntity>, bool) {
        if let Some(entity) = self.tokens.get(word) {
            let entity = entity.clone();
            entity.add_count(amount);
            return (entity, false);
        }

        let mut created = false;
        let entity = self
            .tokens
            .entry(word.to_owned())
            .or_insert_with(|| {
                created = true;
                Arc::new(WordEntity::new(word))
            })
            .clone();
        entity.add_count(amount);
        (entity, created)
    }

    /// Insert or overwrite an entity under its word key
    pub fn register(&self, entity: WordEntity) -> Arc<WordEntity> {
        let shared = Arc::new(entity);
        self.tokens
            .insert(shared.word().to_owned(), shared.clone());
        shared
    }

    pub fn token_for(&self, word: &str) -> Option<Arc<WordEntity>> {
        self.tokens.get(word).map(|entity| entity.clone())
    }

    pub fn has_token(&self, word: &str) -> bool {
        self.tokens.contains_key(word)
    }

    /// Snapshot of all registered entities, order insignificant
    pub fn tokens(&self) -> Vec<Arc<WordEntity>> {
        self.tokens.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_creates_then_increments() {
        let registry = TokenRegistry::new();

        let (entity, created) = registry.observe_by("cat", 1);
        assert!(created);
        assert_eq!(entity.count(), 1);

        let (entity, created) = registry.observe_by("cat", 2);
        assert!(!created);
        assert_eq!(entity.count(), 3);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_overwrites() {
        let registry = TokenRegistry::new();
        registry.register(WordEntity::with_count("cat", 1));
        registry.register(WordEntity::with_count("cat", 9));

        assert_eq!(registry.token_for("cat").unwrap().count(), 9);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_absent() {
        let registry = TokenRegistry::new();
        assert!(registry.token_for("ghost").is_none());
        assert!(!registry.has_token("ghost"));
    }

    #[test]
    fn test_concurrent_observe_same_word() {
        let registry = Arc::new(TokenRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..500 {
                    registry.observe_by("shared", 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.token_for("shared").unwrap().count(), 4_000);
    }
}
