//! Error types for shared fixture types.

use thiserror::Error;

/// Result type for type-level operations.
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors raised while interpreting fixture types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    /// A collection name that is not one of the served entity tables.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A JSON value that should have been an object.
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
