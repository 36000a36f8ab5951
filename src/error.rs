use std::path::PathBuf;

use thiserror::Error;

/// Main error type for wordvault operations
#[derive(Error, Debug)]
pub enum WordvaultError {
    #[error("Word can't be empty")]
    EmptyWord,

    #[error("Cannot promote unregistered word: {0}")]
    NotRegistered(String),

    #[error("Index {0} is reserved for the unknown-word sentinel")]
    ReservedIndex(u32),

    #[error("Snapshot not found at {0}")]
    SnapshotMissing(PathBuf),

    #[error("Snapshot corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("Snapshot error: incompatible version {actual}, expected <= {expected}")]
    IncompatibleSnapshot { expected: u32, actual: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for wordvault operations
pub type Result<T> = std::result::Result<T, WordvaultError>;

impl WordvaultError {
    /// Check if this error was caused by invalid caller input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WordvaultError::EmptyWord | WordvaultError::ReservedIndex(_)
        )
    }

    /// Check if this error came from the persistence layer
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            WordvaultError::SnapshotMissing(_)
                | WordvaultError::CorruptSnapshot(_)
                | WordvaultError::IncompatibleSnapshot { .. }
                | WordvaultError::Serialization(_)
                | WordvaultError::Io(_)
        )
    }
}
