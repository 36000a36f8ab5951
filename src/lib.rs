//! Concurrent vocabulary-lookup cache for embedding training pipelines.
//!
//! Assigns stable integer indices to distinct words observed while scanning
//! a corpus, tracks per-word and per-document occurrence counts, and exposes
//! fast bidirectional word/index lookups. Observation is concurrent and
//! lock-free per shard; vocabulary finalization is an explicit single-writer
//! pass through [`Finalizer`].

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod persistence;

pub use cache::snapshot::{CacheSnapshot, SNAPSHOT_VERSION};
pub use cache::{Finalizer, FrequencyTable, IndexTable, TokenRegistry, VocabCache};
pub use config::{CacheConfig, DEFAULT_UNKNOWN_TOKEN};
pub use error::{Result, WordvaultError};
pub use metrics::CacheMetrics;
pub use models::{WordEntity, WordIndex};
pub use persistence::{import_word_list, SnapshotStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
