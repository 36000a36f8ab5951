//! Dense bidirectional word index.
//!
//! Forward (index -> word) is a dense Vec; reverse (word -> index) is a
//! HashMap. Both sides share the same `Arc<str>` allocation so no word is
//! stored twice. Binds happen in the single-writer finalization phase;
//! lookups may run concurrently from any thread.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, WordvaultError};
use crate::models::WordIndex;

#[derive(Debug, Default)]
struct Inner {
    forward: Vec<Option<Arc<str>>>,
    reverse: HashMap<Arc<str>, WordIndex>,
}

/// Bijection between non-negative indices and words
#[derive(Debug, Default)]
pub struct IndexTable {
    inner: RwLock<Inner>,
}

impl IndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bidirectional mapping `index <-> word`.
    ///
    /// Rebinding is an atomic swap: the stale reverse mapping of the index's
    /// previous word and the stale forward mapping of the word's previous
    /// index are both cleared, so the bijection invariant holds after every
    /// call. Binding the same pair again is a no-op.
    pub fn bind(&self, index: WordIndex, word: &str) -> Result<()> {
        if word.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        let mut inner = self.inner.write();
        let slot = index as usize;
        if slot >= inner.forward.len() {
            inner.forward.resize(slot + 1, None);
        }

        if let Some(existing) = inner.forward[slot].clone() {
            if &*existing == word {
                return Ok(());
            }
            inner.reverse.remove(&*existing);
        }
        if let Some(old_index) = inner.reverse.get(word).copied() {
            inner.forward[old_index as usize] = None;
        }

        let shared: Arc<str> = Arc::from(word);
        inner.forward[slot] = Some(shared.clone());
        inner.reverse.insert(shared, index);
        Ok(())
    }

    /// The word bound at `index`, if any
    pub fn word_at(&self, index: WordIndex) -> Option<Arc<str>> {
        self.inner
            .read()
            .forward
            .get(index as usize)
            .cloned()
            .flatten()
    }

    /// The index bound to `word`, if any
    pub fn index_of(&self, word: &str) -> Option<WordIndex> {
        self.inner.read().reverse.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.read().reverse.contains_key(word)
    }

    /// One past the highest index ever bound; promotion uses this to keep
    /// index assignment dense
    pub fn next_index(&self) -> WordIndex {
        self.inner.read().forward.len() as WordIndex
    }

    /// Number of currently bound indices
    pub fn len(&self) -> usize {
        self.inner.read().reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().reverse.is_empty()
    }

    /// Snapshot of all (index, word) pairs in index order
    pub fn entries(&self) -> Vec<(WordIndex, String)> {
        self.inner
            .read()
            .forward
            .iter()
            .enumerate()
            .filter_map(|(index, word)| {
                word.as_ref()
                    .map(|word| (index as WordIndex, word.to_string()))
            })
            .collect()
    }

    /// Rebuild from persisted (index, word) pairs
    pub fn from_entries(entries: Vec<(WordIndex, String)>) -> Result<Self> {
        let table = Self::new();
        for (index, word) in entries {
            table.bind(index, &word)?;
        }
        Ok(table)
    }
}
