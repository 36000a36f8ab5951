use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Position of a promoted word in the dense vocabulary index space
pub type WordIndex = u32;

/// Sentinel stored in [`WordEntity::index`] before promotion
const UNASSIGNED: i64 = -1;

/// A distinct word observed in the corpus.
///
/// Owned by the token registry behind an `Arc`; every other store keeps the
/// word string as key and re-resolves through the registry. The occurrence
/// counter is entity-local and incremented concurrently by scanning workers;
/// the index is written once during the finalization pass.
#[derive(Debug)]
pub struct WordEntity {
    word: Arc<str>,
    index: AtomicI64,
    count: AtomicU64,
}

impl WordEntity {
    /// Create an entity with a zero occurrence count and no index
    pub fn new(word: impl Into<Arc<str>>) -> Self {
        Self::with_count(word, 0)
    }

    /// Create an entity with an initial occurrence count and no index
    pub fn with_count(word: impl Into<Arc<str>>, count: u64) -> Self {
        Self {
            word: word.into(),
            index: AtomicI64::new(UNASSIGNED),
            count: AtomicU64::new(count),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// The assigned vocabulary index, or `None` before promotion
    pub fn index(&self) -> Option<WordIndex> {
        let raw = self.index.load(Ordering::Relaxed);
        if raw == UNASSIGNED {
            None
        } else {
            Some(raw as WordIndex)
        }
    }

    /// Assign the vocabulary index. Single-writer: called from the
    /// finalization pass or a snapshot restore only.
    pub fn set_index(&self, index: WordIndex) {
        self.index.store(index as i64, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Add to the entity-local occurrence counter, returning the new value
    pub fn add_count(&self, amount: u64) -> u64 {
        self.count.fetch_add(amount, Ordering::Relaxed) + amount
    }
}
