//! Error types for the monitoring engine.

use thiserror::Error;

/// Errors that can occur in the monitoring engine.
///
/// All of these are local and user-recoverable; nothing here is
/// process-fatal. Probing itself cannot fail - it is synthetic.
#[derive(Debug, Error)]
pub enum Error {
    /// A node with this address is already being monitored.
    #[error("node with address \"{address}\" is already being monitored")]
    DuplicateAddress { address: String },

    /// No tracked node carries this id.
    #[error("no node with id \"{id}\"")]
    NodeNotFound { id: String },

    /// A display name or address was empty after trimming.
    #[error("{field} must not be empty")]
    InvalidField { field: &'static str },

    /// Ping interval outside the supported range.
    #[error("ping interval must be between {min} and {max} seconds, got {seconds}")]
    InvalidInterval { seconds: u64, min: u64, max: u64 },

    /// Reorder index outside the node collection.
    #[error("reorder index {index} out of range for {len} nodes")]
    InvalidIndex { index: usize, len: usize },

    /// Configuration source could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Session snapshot (de)serialization failed.
    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export/import failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field in an imported CSV row could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// Underlying IO failure during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
