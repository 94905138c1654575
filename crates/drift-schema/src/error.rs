//! Error types for schema inspection and diffing.

use crate::normalize::LenParseError;

/// Errors that can occur while building or comparing schema states.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The target dialect is not registered as inspectable.
    ///
    /// Reported at inspector construction, never mid-scan.
    #[error("dialect '{0}' does not support schema inspection")]
    UnsupportedDialect(String),

    /// A declared or catalog-reported type string has a malformed
    /// length qualifier. The whole state build is aborted.
    #[error("column {table}.{column}: {source}")]
    TypeParse {
        /// Table owning the offending column.
        table: String,
        /// Column whose type string failed to parse.
        column: String,
        /// The underlying parse failure, carrying the raw type string.
        #[source]
        source: LenParseError,
    },

    /// A catalog query against the live database failed.
    ///
    /// Propagated verbatim; retry policy belongs to the caller.
    #[error("catalog query failed: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SchemaError {
    /// Wraps a driver error as a catalog query failure.
    pub fn catalog(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Catalog(Box::new(err))
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
