// src/error.rs
use crate::index::DocId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopycatError {
    /// Band layout, hash count or threshold do not fit together.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Document {0} not found")]
    NotFound(DocId),

    /// Two signatures from differently configured generators met.
    #[error("Signature size mismatch: {left} vs {right}")]
    SizeMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, CopycatError>;
