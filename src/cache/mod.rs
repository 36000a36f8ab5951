//! Vocabulary cache orchestration.
//!
//! `VocabCache` owns the four sub-stores (token registry, index table, two
//! frequency tables) and the promoted-word set. Scanning workers call the
//! observe/increment operations concurrently; promotion and index binding run
//! through a [`Finalizer`] guard that serializes the finalization pass.

mod frequency;
mod index;
mod registry;
pub mod snapshot;

pub use frequency::FrequencyTable;
pub use index::IndexTable;
pub use registry::TokenRegistry;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashSet;
use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{Result, WordvaultError};
use crate::metrics::CacheMetrics;
use crate::models::{WordEntity, WordIndex};
use snapshot::{CacheSnapshot, TokenRecord, SNAPSHOT_VERSION};

/// Concurrent vocabulary-lookup cache.
///
/// Constructed once per training run. Seeds the unknown-word sentinel at
/// index 0; it stays registered, bound, and promoted for the cache lifetime.
pub struct VocabCache {
    config: CacheConfig,
    registry: TokenRegistry,
    index: IndexTable,
    word_frequencies: FrequencyTable,
    document_frequencies: FrequencyTable,
    /// Promoted word keys; entities re-resolve through the registry
    vocab: DashSet<String>,
    unknown: Arc<WordEntity>,
    total_word_occurrences: AtomicU64,
    total_documents: AtomicU64,
    finalize_lock: Mutex<()>,
    metrics: CacheMetrics,
}

impl VocabCache {
    pub fn new(config: CacheConfig) -> Result<Self> {
        if config.unknown_token.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }

        let registry = TokenRegistry::with_capacity(config.expected_words);
        let index = IndexTable::new();
        let vocab = DashSet::new();

        let unknown = registry.register(WordEntity::with_count(config.unknown_token.as_str(), 1));
        unknown.set_index(0);
        index.bind(0, &config.unknown_token)?;
        vocab.insert(config.unknown_token.clone());

        let metrics = CacheMetrics::default();
        metrics.set_distinct_tokens(1);

        Ok(Self {
            word_frequencies: FrequencyTable::with_capacity(config.expected_words),
            document_frequencies: FrequencyTable::new(),
            registry,
            index,
            vocab,
            unknown,
            total_word_occurrences: AtomicU64::new(0),
            total_documents: AtomicU64::new(0),
            finalize_lock: Mutex::new(()),
            metrics,
            config,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    // ------------------------------------------------------------------
    // Observation (concurrent, scanning phase)
    // ------------------------------------------------------------------

    /// Record one occurrence of `word`
    pub fn observe(&self, word: &str) -> Result<()> {
        self.observe_by(word, 1)
    }

    /// Record `amount` occurrences of `word`.
    ///
    /// Creates the token entity on first sight. Increments the entity
    /// counter, the word-frequency table, and the cache-wide occurrence
    /// total by `amount`; concurrent callers never lose updates.
    pub fn observe_by(&self, word: &str, amount: u64) -> Result<()> {
        if word.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        let (_, created) = self.registry.observe_by(word, amount);
        self.word_frequencies.increment(word, amount);
        self.total_word_occurrences.fetch_add(amount, Ordering::Relaxed);

        self.metrics.record_observed(amount);
        if created {
            self.metrics.set_distinct_tokens(self.registry.len() as u64);
        }
        Ok(())
    }

    /// Insert or overwrite a pre-built entity under its word key
    pub fn register(&self, entity: WordEntity) -> Result<Arc<WordEntity>> {
        if entity.word().is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        let shared = self.registry.register(entity);
        self.metrics.set_distinct_tokens(self.registry.len() as u64);
        Ok(shared)
    }

    pub fn token_for(&self, word: &str) -> Option<Arc<WordEntity>> {
        self.registry.token_for(word)
    }

    pub fn has_token(&self, word: &str) -> bool {
        self.registry.has_token(word)
    }

    /// All registered entities, promoted or not
    pub fn tokens(&self) -> Vec<Arc<WordEntity>> {
        self.registry.tokens()
    }

    pub fn token_count(&self) -> usize {
        self.registry.len()
    }

    // ------------------------------------------------------------------
    // Frequency and document statistics
    // ------------------------------------------------------------------

    /// Times `word` has been observed, 0 if never
    pub fn word_frequency(&self, word: &str) -> u64 {
        self.word_frequencies.get(word)
    }

    /// Documents `word` appeared in, 0 if never counted
    pub fn document_frequency(&self, word: &str) -> u64 {
        self.document_frequencies.get(word)
    }

    pub fn increment_document_frequency(&self, word: &str, amount: u64) -> Result<()> {
        if word.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        self.document_frequencies.increment(word, amount);
        Ok(())
    }

    /// Absolute overwrite of a document-frequency counter. Escape hatch for
    /// bulk-loading precomputed statistics; no validation against history.
    pub fn set_document_frequency(&self, word: &str, count: u64) -> Result<()> {
        if word.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        self.document_frequencies.set(word, count);
        Ok(())
    }

    /// Sum of all observe amounts ever applied
    pub fn total_word_occurrences(&self) -> u64 {
        self.total_word_occurrences.load(Ordering::Relaxed)
    }

    pub fn total_documents(&self) -> u64 {
        self.total_documents.load(Ordering::Relaxed)
    }

    pub fn increment_document_count(&self) -> u64 {
        self.increment_document_count_by(1)
    }

    pub fn increment_document_count_by(&self, amount: u64) -> u64 {
        self.metrics.record_documents(amount);
        self.total_documents.fetch_add(amount, Ordering::Relaxed) + amount
    }

    // ------------------------------------------------------------------
    // Index and vocabulary lookups (concurrent reads)
    // ------------------------------------------------------------------

    /// The word bound at `index`, if any
    pub fn word_at(&self, index: WordIndex) -> Option<Arc<str>> {
        self.index.word_at(index)
    }

    /// The index assigned to `word`, if promoted
    pub fn index_of(&self, word: &str) -> Option<WordIndex> {
        self.index.index_of(word)
    }

    /// Promoted membership test
    pub fn contains_word(&self, word: &str) -> bool {
        self.vocab.contains(word)
    }

    /// Promoted entity for `word`, or the unknown sentinel. Never absent:
    /// downstream numeric consumers assume a closed vocabulary.
    pub fn resolve(&self, word: &str) -> Arc<WordEntity> {
        if self.vocab.contains(word) {
            if let Some(entity) = self.registry.token_for(word) {
                return entity;
            }
        }
        self.unknown.clone()
    }

    /// Number of promoted words, excluding the unknown sentinel
    pub fn size(&self) -> usize {
        let count = self.vocab.len();
        if self.vocab.contains(self.unknown.word()) {
            count - 1
        } else {
            count
        }
    }

    /// Snapshot of the promoted word set (sentinel included)
    pub fn words(&self) -> Vec<String> {
        self.vocab.iter().map(|word| word.key().clone()).collect()
    }

    /// Promoted entities, re-resolved through the registry
    pub fn vocab_entities(&self) -> Vec<Arc<WordEntity>> {
        self.vocab
            .iter()
            .filter_map(|word| self.registry.token_for(word.key()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Finalization (single-writer phase)
    // ------------------------------------------------------------------

    /// Start a finalization pass. The returned guard serializes promotion
    /// and index binding: a second caller blocks until the first guard is
    /// dropped. Reads stay concurrent throughout.
    pub fn finalizer(&self) -> Finalizer<'_> {
        Finalizer {
            cache: self,
            _guard: self.finalize_lock.lock(),
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Capture the full cache state
    pub fn to_snapshot(&self) -> CacheSnapshot {
        let tokens = self
            .registry
            .tokens()
            .iter()
            .map(|entity| TokenRecord {
                word: entity.word().to_owned(),
                index: entity.index(),
                count: entity.count(),
            })
            .collect();

        CacheSnapshot {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            tokens,
            word_frequencies: self.word_frequencies.entries(),
            document_frequencies: self.document_frequencies.entries(),
            index_entries: self.index.entries(),
            promoted: self.words(),
            total_word_occurrences: self.total_word_occurrences(),
            total_documents: self.total_documents(),
        }
    }

    /// Serialize the full cache state to an opaque blob
    pub fn export_snapshot(&self) -> Result<Vec<u8>> {
        Ok(self.to_snapshot().to_bytes()?)
    }

    /// Rebuild a cache from a captured snapshot
    pub fn from_snapshot(snapshot: CacheSnapshot) -> Result<Self> {
        if !snapshot.is_compatible() {
            return Err(WordvaultError::IncompatibleSnapshot {
                expected: SNAPSHOT_VERSION,
                actual: snapshot.version,
            });
        }

        let registry = TokenRegistry::with_capacity(snapshot.tokens.len());
        for record in &snapshot.tokens {
            let entity = WordEntity::with_count(record.word.as_str(), record.count);
            if let Some(index) = record.index {
                entity.set_index(index);
            }
            registry.register(entity);
        }

        let unknown = registry
            .token_for(&snapshot.config.unknown_token)
            .ok_or_else(|| {
                WordvaultError::CorruptSnapshot(
                    "unknown-word sentinel missing from token records".to_string(),
                )
            })?;

        let index = IndexTable::from_entries(snapshot.index_entries)?;
        let vocab = DashSet::new();
        for word in snapshot.promoted {
            vocab.insert(word);
        }

        let cache = Self {
            config: snapshot.config,
            registry,
            index,
            word_frequencies: FrequencyTable::from_entries(snapshot.word_frequencies),
            document_frequencies: FrequencyTable::from_entries(snapshot.document_frequencies),
            vocab,
            unknown,
            total_word_occurrences: AtomicU64::new(snapshot.total_word_occurrences),
            total_documents: AtomicU64::new(snapshot.total_documents),
            finalize_lock: Mutex::new(()),
            metrics: CacheMetrics::default(),
        };
        cache.metrics.set_distinct_tokens(cache.registry.len() as u64);
        cache.metrics.set_vocabulary_size(cache.size() as u64);
        Ok(cache)
    }

    /// Replace this cache's internal stores with the state in `data`
    pub fn import_snapshot(&mut self, data: &[u8]) -> Result<()> {
        let snapshot = CacheSnapshot::from_bytes(data)?;
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }
}

/// Single-writer handle for the finalization pass.
///
/// Holds the cache's finalize mutex for its lifetime, so concurrent
/// `promote`/`bind` calls cannot interleave. Obtain via
/// [`VocabCache::finalizer`].
pub struct Finalizer<'a> {
    cache: &'a VocabCache,
    _guard: MutexGuard<'a, ()>,
}

impl Finalizer<'_> {
    /// Promote a registered word into the finalized vocabulary.
    ///
    /// Assigns the next dense index if the entity has none yet, binds the
    /// index table, and inserts the word into the promoted set. Idempotent:
    /// promoting an already-promoted word re-binds without duplicating.
    /// Promotion never auto-registers; observe or register first.
    pub fn promote(&self, word: &str) -> Result<WordIndex> {
        if word.is_empty() {
            return Err(WordvaultError::EmptyWord);
        }
        let cache = self.cache;
        let entity = cache
            .registry
            .token_for(word)
            .ok_or_else(|| WordvaultError::NotRegistered(word.to_owned()))?;

        let index = match entity.index() {
            Some(index) => index,
            None => cache.index.next_index(),
        };
        if index == 0 && word != cache.unknown.word() {
            return Err(WordvaultError::ReservedIndex(0));
        }

        cache.index.bind(index, word)?;
        entity.set_index(index);

        if cache.vocab.insert(word.to_owned()) {
            debug!(word, index, "promoted word into vocabulary");
            cache.metrics.record_promoted();
            cache.metrics.set_vocabulary_size(cache.size() as u64);
        }
        Ok(index)
    }

    /// Bind `index <-> word` directly, for callers restoring a precomputed
    /// layout. Index 0 stays reserved for the sentinel.
    pub fn bind(&self, index: WordIndex, word: &str) -> Result<()> {
        if index == 0 && word != self.cache.unknown.word() {
            return Err(WordvaultError::ReservedIndex(0));
        }
        self.cache.index.bind(index, word)
    }
}
