//! Error types for schema loading and class generation.
//!
//! Every [`GenError`] is a contract violation between the schema and the
//! selected backend. None of them is recoverable: the driver stops on the
//! first one and no output is produced.
use std::path::PathBuf;

use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    /// A combinator, arg or type-tree shape the backend cannot express reached
    /// an emission hook.
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// A hook was asked for a capability the backend never implements.
    #[error("unsupported feature requested: {0}")]
    UnsupportedFeatureRequested(String),

    /// Malformed identifier handed to the naming engine.
    #[error("identifier violation: {0}")]
    IdentifierViolation(String),

    /// A type tree names a type that is neither built in nor declared.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// Where in the schema the wrapped error happened.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<GenError>,
    },
}

impl GenError {
    pub fn shape(detail: impl Into<String>) -> Self {
        GenError::UnsupportedShape(detail.into())
    }

    pub fn feature(detail: impl Into<String>) -> Self {
        GenError::UnsupportedFeatureRequested(detail.into())
    }

    pub fn identifier(detail: impl Into<String>) -> Self {
        GenError::IdentifierViolation(detail.into())
    }

    /// The innermost error, with all context layers peeled off.
    pub fn root_cause(&self) -> &GenError {
        match self {
            GenError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attach schema-location context to a failing hook.
pub trait ResultExt<T> {
    fn in_context<F>(self, context: F) -> GenResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for GenResult<T> {
    fn in_context<F>(self, context: F) -> GenResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| GenError::Context {
            context: context(),
            source: Box::new(source),
        })
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema JSON in {path}: at JSON path {json_path} → {message}")]
    Json {
        path: PathBuf,
        json_path: String,
        message: String,
    },

    #[error("invalid input pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),

    #[error("type `{0}` is declared in more than one schema fragment")]
    DuplicateType(String),
}
