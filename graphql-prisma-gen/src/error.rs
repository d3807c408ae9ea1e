//! Error types for code generation
//!
//! Schema inconsistencies, configuration problems and IO failures all abort a
//! run. Formatter failures are reported separately through [`FormatError`]
//! because the pipeline recovers from them.

use std::path::PathBuf;

/// Error type for code generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Code generation failed
    #[error("code generation error: {0}")]
    CodeGenError(String),

    /// Failed to decode the raw schema document
    #[error("parse error: {0}")]
    Parse(String),

    /// A field or argument type could not be resolved to a known type
    #[error("cannot resolve type `{type_name}` ({location}) used by `{context}`")]
    UnresolvedType {
        /// Raw type name
        type_name: String,
        /// Raw storage location
        location: String,
        /// Owning model/type and field
        context: String,
    },

    /// An operation mapping points to a field no root type defines
    #[error("cannot find type with field `{field}` in root types definitions (model `{model}`)")]
    MissingMappedField {
        /// Model the mapping belongs to
        model: String,
        /// Mapped operation field name
        field: String,
    },

    /// A primary key or unique index names a field the model does not have
    #[error("model `{model}` has no field `{field}` referenced by its key `{key}`")]
    MissingKeyField {
        /// Model name
        model: String,
        /// Key or index name
        key: String,
        /// Missing field name
        field: String,
    },

    /// No id, unique or composite key is available to filter a relation parent
    #[error("cannot build a unique filter for relation resolvers of model `{model}`")]
    AmbiguousRelationFilter {
        /// Model display name
        model: String,
    },

    /// A configuration value is not one of the accepted values
    #[error("invalid value `{value}` for option `{key}`, expected {expected}")]
    InvalidOption {
        /// Option key
        key: String,
        /// Rejected value
        value: String,
        /// Human readable list of accepted values
        expected: String,
    },

    /// A required configuration value is missing
    #[error("missing required option `{0}`")]
    MissingOption(String),

    /// Filesystem failure while preparing or writing the output tree
    #[error("io error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        GeneratorError::Parse(e.to_string())
    }
}

/// A recoverable failure of the post-processing formatter
#[derive(Debug, thiserror::Error)]
#[error("formatting {path} failed: {message}")]
pub struct FormatError {
    /// File that could not be formatted
    pub path: PathBuf,
    /// Formatter diagnostic
    pub message: String,
}
