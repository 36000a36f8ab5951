//! Concurrent per-word counters.
//!
//! Backs both the global word-frequency table and the document-frequency
//! table. Increments are commutative: the final count after N concurrent
//! increments equals their sum regardless of interleaving.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Word -> non-negative count, safe for concurrent increment and read
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: DashMap<String, AtomicU64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: DashMap::with_capacity(capacity),
        }
    }

    /// Add `amount` to the counter for `word`, returning the new value
    pub fn increment(&self, word: &str, amount: u64) -> u64 {
        // Fast path: counter already exists, no key allocation
        if let Some(counter) = self.counts.get(word) {
            return counter.fetch_add(amount, Ordering::Relaxed) + amount;
        }
        self.counts
            .entry(word.to_owned())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed)
            + amount
    }

    /// Absolute overwrite, no validation against increment history
    pub fn set(&self, word: &str, count: u64) {
        if let Some(counter) = self.counts.get(word) {
            counter.store(count, Ordering::Relaxed);
            return;
        }
        self.counts
            .entry(word.to_owned())
            .or_insert_with(|| AtomicU64::new(0))
            .store(count, Ordering::Relaxed);
    }

    /// Current count for `word`, 0 if never counted
    pub fn get(&self, word: &str) -> u64 {
        self.counts
            .get(word)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Snapshot of all (word, count) pairs, order insignificant
    pub fn entries(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Rebuild from persisted (word, count) pairs
    pub fn from_entries(entries: Vec<(String, u64)>) -> Self {
        let table = Self::with_capacity(entries.len());
        for (word, count) in entries {
            table.counts.insert(word, AtomicU64::new(count));
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_increment_and_get() {
        let table = FrequencyTable::new();
        assert_eq!(table.get("cat"), 0);

        assert_eq!(table.increment("cat", 1), 1);
        assert_eq!(table.increment("cat", 4), 5);
        assert_eq!(table.get("cat"), 5);
        assert_eq!(table.get("dog"), 0);
    }

    #[test]
    fn test_set_overwrites() {
        let table = FrequencyTable::new();
        table.increment("cat", 10);
        table.set("cat", 3);
        assert_eq!(table.get("cat"), 3);

        // set on an unseen word creates the counter
        table.set("dog", 42);
        assert_eq!(table.get("dog"), 42);
    }

    #[test]
    fn test_entries_roundtrip() {
        let table = FrequencyTable::new();
        table.increment("alpha", 2);
        table.increment("beta", 7);

        let restored = FrequencyTable::from_entries(table.entries());
        assert_eq!(restored.get("alpha"), 2);
        assert_eq!(restored.get("beta"), 7);
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn test_concurrent_increments_sum() {
        let table = Arc::new(FrequencyTable::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let table = table.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1_000 {
                    table.increment("shared", 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(table.get("shared"), 8_000);
    }
}
