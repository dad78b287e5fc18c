//! Error types for tracker operations.

use thiserror::Error;

/// Errors raised by tracker mutations and storage.
///
/// Data-quality problems in host data (unknown tiers, missing fields,
/// malformed persisted blobs) are not errors; they degrade to defaults.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No record with this id in the current achievement set
    #[error("Unknown achievement id: {0}")]
    UnknownAchievement(u32),
    /// User difficulty ratings run from 0 (unrated) to 5
    #[error("Invalid difficulty rating: {0} (expected 0-5)")]
    InvalidDifficulty(u8),
    /// Tier goal name not recognised
    #[error("Invalid tier goal: {0}")]
    InvalidTierGoal(String),
    /// Sort key name not recognised
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),
    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Config file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
