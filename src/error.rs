//! Error definitions for the model generation pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum ModelgenError {
    /// Malformed AST shape (for example a root node without a standalone name,
    /// or an enum member whose value is not a literal).
    #[error("structure error: {0}")]
    StructureError(String),
    /// Literal value serialization failure.
    #[error("serialization error: {0}")]
    SerializationError(String),
}
