//! Error types for the language model and generators.

use crate::types::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageError {
    /// The target dialect cannot express a construct and no rewrite rule is
    /// configured for it. Surfaced before any SQL text is returned.
    #[error("dialect '{dialect}' cannot express {construct}")]
    UnsupportedCapability {
        dialect: &'static str,
        construct: String,
    },

    /// The target dialect has no type name for a CAST/CONVERT target.
    #[error("dialect '{dialect}' has no cast type name for '{data_type}'")]
    TypeMapping {
        dialect: &'static str,
        data_type: DataType,
    },
}

impl LanguageError {
    /// Create an unsupported-capability error.
    pub fn unsupported(dialect: &'static str, construct: impl Into<String>) -> Self {
        Self::UnsupportedCapability {
            dialect,
            construct: construct.into(),
        }
    }
}

/// Result type alias for language-model operations.
pub type LanguageResult<T> = Result<T, LanguageError>;
