//! Labeled source spans for diagnostic messages.
//!
//! A label ties a message to one line of the parse tree export, so the CLI
//! can point at the offending line when it reports a structural error.

use crate::span::Span;

/// A labeled span in the source.
///
/// - **Primary labels** mark the line that broke the tree structure.
/// - **Secondary labels** point at related lines, such as the root that a
///   stray top-level line competes with.
///
/// # Example
///
/// ```text
/// error[E102]: parse tree has more than one root
///    |
///  4 | +--<program> ::= <statement_list>
///    | --------------------------------- tree root is here
///  9 | +--<END> ::= END
///    | ^^^^^^^^^^^^^^^^ second top-level node
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}
