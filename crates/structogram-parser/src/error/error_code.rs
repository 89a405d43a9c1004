//! Error codes for structural problems in a parse tree export.
//!
//! All codes belong to the tree reading phase (`E1xx`).

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Root not at level 0.
    ///
    /// The first line of the tree section is indented.
    E100,

    /// Root is not an expression.
    ///
    /// The first line of the tree section does not start with `<`.
    E101,

    /// More than one root.
    ///
    /// A later line is not deeper than the root, so it has no parent.
    E102,

    /// Malformed tree line.
    ///
    /// The line does not follow the `|  +--<text>` layout.
    E103,

    /// Missing parse tree.
    ///
    /// No tree line follows the header block.
    E104,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "root not at level 0",
            ErrorCode::E101 => "root is not an expression",
            ErrorCode::E102 => "more than one root",
            ErrorCode::E103 => "malformed tree line",
            ErrorCode::E104 => "missing parse tree",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
