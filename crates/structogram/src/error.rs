//! Error types for Structogram operations.
//!
//! This module provides the main error type [`StructogramError`] which wraps
//! the error conditions that can occur while converting a parse tree.

use std::io;

use thiserror::Error;

use structogram_parser::error::ParseError;

/// The main error type for Structogram operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured parse
/// error, so the labeled spans can be shown against the offending lines.
#[derive(Debug, Error)]
pub enum StructogramError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StructogramError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
