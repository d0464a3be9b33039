//! Error taxonomy for the matching engine
//!
//! Similarity scoring is total and never fails. Errors only arise from
//! registry misuse, unusable options, or algorithms that refuse to run.

use thiserror::Error;

/// Result type alias using [`MatchError`]
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors surfaced by the registry, the engine and `compare()`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Category other than `paragraph` or `sentence`
    #[error("invalid algorithm category '{0}' (expected 'paragraph' or 'sentence')")]
    InvalidCategory(String),

    /// Algorithm does not satisfy the metadata contract
    #[error("invalid algorithm: {reason}")]
    InvalidAlgorithm { reason: String },

    /// A registered placeholder that refuses to run
    #[error("algorithm '{name}' is not implemented")]
    NotImplemented { name: String },

    /// Options that cannot be normalized into a usable configuration
    #[error("malformed options: {0}")]
    MalformedOptions(String),

    /// Engine-level lookup by name failed
    #[error("no '{name}' algorithm registered for category '{category}'")]
    UnknownAlgorithm { category: String, name: String },

    /// A pluggable sentence detector failed
    #[error("sentence detection failed: {0}")]
    Segmentation(String),
}

impl MatchError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidCategory(_) => "ERR_INVALID_CATEGORY",
            MatchError::InvalidAlgorithm { .. } => "ERR_INVALID_ALGORITHM",
            MatchError::NotImplemented { .. } => "ERR_NOT_IMPLEMENTED",
            MatchError::MalformedOptions(_) => "ERR_MALFORMED_OPTIONS",
            MatchError::UnknownAlgorithm { .. } => "ERR_UNKNOWN_ALGORITHM",
            MatchError::Segmentation(_) => "ERR_SEGMENTATION",
        }
    }
}
