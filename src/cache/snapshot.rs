//! Serialized form of the full cache state.

use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;
use crate::models::WordIndex;

/// Snapshot version for compatibility checking
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted form of a [`crate::models::WordEntity`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenRecord {
    pub word: String,
    pub index: Option<WordIndex>,
    pub count: u64,
}

/// Complete snapshot of a vocabulary cache.
///
/// Captures the token registry, both frequency tables, the index layout, the
/// promoted set, and the cache-wide counters; restoring from it reproduces
/// every lookup result exactly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub version: u32,
    pub config: CacheConfig,
    pub tokens: Vec<TokenRecord>,
    pub word_frequencies: Vec<(String, u64)>,
    pub document_frequencies: Vec<(String, u64)>,
    pub index_entries: Vec<(WordIndex, String)>,
    pub promoted: Vec<String>,
    pub total_word_occurrences: u64,
    pub total_documents: u64,
}

impl CacheSnapshot {
    /// Serialize snapshot to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize snapshot from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }

    /// Check if this snapshot version is compatible
    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_VERSION
    }
}
