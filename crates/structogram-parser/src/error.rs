//! Error and diagnostic system for the Structogram parser.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing at the offending lines
//!
//! # Overview
//!
//! A structural problem in the export is described by a [`Diagnostic`]. The
//! public entry points wrap it in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use structogram_parser::error::{Diagnostic, ErrorCode};
//! # use structogram_parser::Span;
//!
//! let diag = Diagnostic::error("parse tree root is not at level 0")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(24..60), "found at level 2")
//!     .with_help("the first tree line must start with `+--`");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
