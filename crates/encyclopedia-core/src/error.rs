//! Error types for Encyclopedia Core

use thiserror::Error;

/// Result type alias using Encyclopedia's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Encyclopedia error types
///
/// Every variant is a local, synchronous failure. Nothing is retried or
/// recovered inside the crate; mutating a frozen container is not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid cardinality: {0}")]
    InvalidCardinality(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for the not-found family (key, alias or node)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound(_) | Self::AliasNotFound(_) | Self::NodeNotFound(_)
        )
    }
}
