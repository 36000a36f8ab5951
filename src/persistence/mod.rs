//! Snapshot files and plain-text vocabulary import.
//!
//! A snapshot file is a single framed record: u32 payload length (little
//! endian), u32 crc32 of the payload, then the bincode-encoded
//! [`CacheSnapshot`]. Checksum or length mismatches surface as
//! [`WordvaultError::CorruptSnapshot`] rather than garbage lookups.

use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crc32fast::Hasher;
use tracing::{debug, info};

use crate::cache::snapshot::CacheSnapshot;
use crate::cache::VocabCache;
use crate::config::CacheConfig;
use crate::error::{Result, WordvaultError};

/// Handle to a snapshot location on disk.
///
/// Construction performs no I/O; each cache that needs persistence gets its
/// own store, so multiple caches can coexist under different paths.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot exists at this location. Never errors.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the cache's full state, replacing any previous snapshot
    pub fn save(&self, cache: &VocabCache) -> Result<()> {
        let start = Instant::now();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let payload = cache.export_snapshot()?;
        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let crc32 = hasher.finalize();

        let mut file = File::create(&self.path)?;
        file.write_all(&(payload.len() as u32).to_le_bytes())?;
        file.write_all(&crc32.to_le_bytes())?;
        file.write_all(&payload)?;

        cache
            .metrics()
            .record_snapshot_save(start.elapsed().as_secs_f64());
        info!(
            path = %self.path.display(),
            bytes = payload.len(),
            "saved vocabulary snapshot"
        );
        Ok(())
    }

    /// Restore a cache from this location, validating the checksum
    pub fn load(&self) -> Result<VocabCache> {
        if !self.exists() {
            return Err(WordvaultError::SnapshotMissing(self.path.clone()));
        }

        let mut file = File::open(&self.path)?;
        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf)
            .map_err(|_| WordvaultError::CorruptSnapshot("truncated header".to_string()))?;
        let len = u32::from_le_bytes(len_buf) as usize;

        let mut crc_buf = [0u8; 4];
        file.read_exact(&mut crc_buf)
            .map_err(|_| WordvaultError::CorruptSnapshot("truncated header".to_string()))?;
        let stored_crc = u32::from_le_bytes(crc_buf);

        let mut payload = vec![0u8; len];
        file.read_exact(&mut payload)
            .map_err(|_| WordvaultError::CorruptSnapshot("truncated payload".to_string()))?;

        let mut hasher = Hasher::new();
        hasher.update(&payload);
        if hasher.finalize() != stored_crc {
            return Err(WordvaultError::CorruptSnapshot(
                "checksum mismatch (corrupt record)".to_string(),
            ));
        }

        let snapshot = CacheSnapshot::from_bytes(&payload)?;
        let cache = VocabCache::from_snapshot(snapshot)?;
        cache.metrics().record_snapshot_load();
        info!(
            path = %self.path.display(),
            words = cache.size(),
            "restored vocabulary snapshot"
        );
        Ok(cache)
    }
}

/// Build a fresh cache from one-word-per-line input.
///
/// Blank lines are skipped. Each surviving line is observed once (weight 1)
/// and promoted immediately, so indices are dense after the sentinel: the
/// first word lands at index 1. This is a bulk constructor, not a merge.
pub fn import_word_list<R: BufRead>(reader: R, config: CacheConfig) -> Result<VocabCache> {
    let cache = VocabCache::new(config)?;
    {
        let finalizer = cache.finalizer();
        for line in reader.lines() {
            let word = line?;
            if word.is_empty() {
                continue;
            }
            cache.observe(&word)?;
            finalizer.promote(&word)?;
        }
    }
    debug!(words = cache.size(), "imported plain-text vocabulary");
    Ok(cache)
}
