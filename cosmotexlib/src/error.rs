//! Error types for cosmotexlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting or writing cosmology tables
#[derive(Error, Debug)]
pub enum CosmotexError {
    /// Destination file exists and overwriting was not requested
    #[error("{} already exists and 'overwrite' is false", path.display())]
    AlreadyExists { path: PathBuf },

    /// A model could not be converted into a table
    #[error("cannot convert to table: {0}")]
    Conversion(String),

    /// A writer option key that the LaTeX writer does not recognize
    #[error("unknown writer option '{key}'")]
    UnknownOption { key: String },

    /// A recognized writer option with an unusable value
    #[error("invalid value for option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    /// No built-in realization with this name
    #[error("unknown cosmology realization: {0}")]
    UnknownCosmology(String),

    /// Malformed LaTeX table input
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Failed to decode a model or options file
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
