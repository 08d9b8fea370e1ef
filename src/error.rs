//! Error types for batch writing and export.

use thiserror::Error;

use crate::{arrow_schema::ArrowError, parquet::errors::ParquetError, schema::Category};

/// Errors raised while building writers, filling a batch, or handing it to a sink.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The schema contains a category no column writer exists for.
    #[error("unsupported schema at {path}: no column writer for category `{category}`")]
    UnsupportedSchema {
        /// Dot/segment annotated path of the offending column (e.g., "person.tags[]").
        path: String,
        /// The category that was rejected.
        category: Category,
    },

    /// A container descriptor has the wrong number of children or field names.
    #[error("malformed schema at {path}: {message}")]
    MalformedSchema {
        /// Path of the column.
        path: String,
        /// What is wrong with the descriptor.
        message: String,
    },

    /// A column vector's shape does not fit the descriptor it was paired with.
    #[error("column vector at {path} does not fit a `{category}` descriptor")]
    VectorMismatch {
        /// Path of the column.
        path: String,
        /// Category the descriptor declares.
        category: Category,
    },

    /// A non-null value had the wrong shape for its column (strict mismatch policy only).
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the column.
        path: String,
        /// Category the column declares.
        expected: Category,
        /// Variant name of the value that was supplied.
        found: &'static str,
    },

    /// A filled vector could not be represented in the sink's format.
    #[error("export error at {path}: {message}")]
    Export {
        /// Path of the column.
        path: String,
        /// Human-readable reason.
        message: String,
    },

    /// Arrow rejected an array or batch during export.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// The Parquet writer failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

impl BatchError {
    pub(crate) fn export(path: &str, message: impl Into<String>) -> Self {
        BatchError::Export {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
