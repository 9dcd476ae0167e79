//! Error types for the fixture store.

use ci_mock_types::Collection;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the fixture store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// No record matches a field query.
    #[error("no {collection} record matches {query}")]
    NoMatch { collection: Collection, query: String },

    /// A record with the same id already exists.
    #[error("{collection} record already exists: {id}")]
    DuplicateId { collection: Collection, id: String },

    /// A fixture document is structurally invalid.
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    /// Fixture file could not be read.
    #[error("failed to read fixtures from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML fixture document could not be parsed.
    #[error("failed to parse YAML fixtures: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON fixture document could not be parsed.
    #[error("failed to parse JSON fixtures: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::NoMatch { .. } => 404,
            Self::DuplicateId { .. } => 409,
            Self::InvalidFixture(_) => 422,
            Self::Io { .. } => 500,
            Self::Yaml(_) => 422,
            Self::Json(_) => 422,
        }
    }

    /// Whether this error means a fixture was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoMatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let missing = StoreError::NotFound {
            collection: Collection::Crons,
            id: "9".into(),
        };
        assert_eq!(missing.status_code(), 404);
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "crons record not found: 9");

        let duplicate = StoreError::DuplicateId {
            collection: Collection::Builds,
            id: "1".into(),
        };
        assert_eq!(duplicate.status_code(), 409);
        assert!(!duplicate.is_not_found());
    }
}
