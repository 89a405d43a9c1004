//! # Structogram Parser
//!
//! Reader for GOLD Parser parse tree exports. This crate turns the
//! indentation-formatted text of an export into a
//! [`GrammarTree`](structogram_core::grammar::GrammarTree).
//!
//! ## Usage
//!
//! ```
//! # use structogram_parser::{parse, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "Parse Tree\n\
//!                   \n\
//!                   +--<program> ::= <statement_list>\n\
//!                   |  +--<END> ::= END\n\
//!                   |  |  +--END\n";
//!
//!     let tree = parse(source)?;
//!     assert_eq!(tree.len(), 3);
//!     Ok(())
//! }
//! ```

mod builder;
pub mod error;
mod lexer;
mod span;

pub use span::Span;

use log::info;

use structogram_core::grammar::GrammarTree;

use error::ParseError;

/// Parse a complete export into a grammar tree.
///
/// The pipeline has three steps:
///
/// 1. **Select** - Skip the header block and take the tree section
/// 2. **Split** - Decompose each line into its level and text
/// 3. **Build** - Insert the nodes under an indentation cursor
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first structural problem found.
pub fn parse(source: &str) -> Result<GrammarTree, ParseError> {
    let lines = lexer::tree_section(lexer::source_lines(source));
    let tree = builder::build_tree(lines)?;

    info!(nodes = tree.len(); "Parse tree read");
    Ok(tree)
}

/// Build a grammar tree from tree lines that are already separated from the
/// export header.
///
/// Line spans are computed as if the lines were joined with `\n`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first structural problem found.
///
/// # Example
///
/// ```
/// # use structogram_parser::parse_lines;
/// let tree = parse_lines(["+--<program>", "|  +--<END>", "|  |  +--END"]).unwrap();
/// assert_eq!(tree.len(), 3);
/// ```
pub fn parse_lines<'src, I>(lines: I) -> Result<GrammarTree, ParseError>
where
    I: IntoIterator<Item = &'src str>,
{
    let lines = lines
        .into_iter()
        .scan(0, |offset, text| {
            let line = lexer::SourceLine::new(text, *offset);
            *offset += text.len() + 1;
            Some(line)
        })
        .take_while(|line| !line.is_blank());

    Ok(builder::build_tree(lines)?)
}
