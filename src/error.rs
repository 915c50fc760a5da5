//! Error types for collaborator boundaries
//!
//! The simulation itself never fails; these only describe what can go wrong
//! when talking to storage, the leaderboard, or loading configuration. The
//! session controller catches all of them and degrades to cached values.

/// Statistics persistence failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backing store could not be read or written
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored payload could not be (de)serialized
    #[error("storage payload invalid: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No backing store on this platform (private browsing, quota, etc.)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Leaderboard failures
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    /// Submission failed validation (bad identifier, out-of-range score)
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// Leaderboard backend could not be reached
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
}

/// Configuration load/save failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the config file to disk
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse or serialize JSON content
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),
}
