//! Error types for studio-textures
//!
//! External-service failures (AI, image) have their own error enums next to
//! their clients and are recovered locally; only `PipelineError` escapes a
//! resolver or synthesizer call.

use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Catalog has no material categories at all, so a new texture has nothing to link to
    #[error("Catalog inconsistency: no material categories exist")]
    NoCategories,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced record is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input (incomplete bilingual name, bad stored value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tag list (de)serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// studio-common error
    #[error("Common error: {0}")]
    Common(#[from] studio_common::Error),
}

impl PipelineError {
    /// Fatal errors abort the whole style instead of skipping one descriptor
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::NoCategories)
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
