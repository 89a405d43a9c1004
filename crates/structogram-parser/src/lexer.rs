//! Line reader for parse tree exports.
//!
//! An export starts with a header block that ends at the first blank line.
//! The tree section follows, one node per line, and ends at the next blank
//! line or at the end of the input:
//!
//! ```text
//! +--<program> ::= <statement_list>
//! |  +--<MOVE> ::= MOVE <operand> TO <operand>
//! |  |  +--MOVE
//! |  |  +--1
//! ```
//!
//! Each tree line is a run of level markers (`|`, padded with spaces), the
//! `+--` separator and the node text. [`split_tree_line`] decomposes a line
//! into its level and text.

use winnow::{
    Parser as _,
    error::{ContextError, ErrMode},
    token::{literal, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::Span,
};

/// Marker whose count gives the depth of a tree line.
const LEVEL_MARKER: char = '|';

/// Separator between the level markers and the node text.
const SEPARATOR: &str = "+--";

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// A raw line of the export with its position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'src> {
    text: &'src str,
    span: Span,
}

impl<'src> SourceLine<'src> {
    /// Create a line starting at byte `offset`; line terminators are dropped.
    pub(crate) fn new(text: &'src str, offset: usize) -> Self {
        let text = text.trim_end_matches(['\r', '\n']);
        Self {
            text,
            span: Span::new(offset..offset + text.len()),
        }
    }

    /// The line without its terminator.
    pub(crate) fn text(&self) -> &'src str {
        self.text
    }

    /// Location of the line in the source.
    pub(crate) fn span(&self) -> Span {
        self.span
    }

    /// Returns `true` for empty and whitespace-only lines.
    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A decomposed tree line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeLine<'src> {
    pub level: usize,
    pub text: &'src str,
    pub span: Span,
}

/// Split `source` into lines, keeping byte offsets.
pub(crate) fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some(SourceLine::new(line, start))
    })
}

/// Select the tree section: skip the header block up to and including the
/// first blank line, then yield lines until the next blank line.
pub(crate) fn tree_section<'src, I>(lines: I) -> impl Iterator<Item = SourceLine<'src>>
where
    I: IntoIterator<Item = SourceLine<'src>>,
{
    lines
        .into_iter()
        .skip_while(|line| !line.is_blank())
        .skip(1)
        .take_while(|line| !line.is_blank())
}

/// Decompose a tree line into its level and node text.
///
/// # Errors
///
/// Returns an `E103` diagnostic when the line has anything other than level
/// markers and spaces before the `+--` separator.
pub(crate) fn split_tree_line(line: SourceLine<'_>) -> Result<TreeLine<'_>> {
    let mut input = line.text();

    match tree_line(&mut input) {
        Ok((level, text)) => Ok(TreeLine {
            level,
            text,
            span: line.span(),
        }),
        Err(_) => Err(Diagnostic::error("line is missing the `+--` separator")
            .with_code(ErrorCode::E103)
            .with_label(line.span(), "expected level markers followed by `+--`")
            .with_help("every tree line has the form `|  |  +--<text>`")),
    }
}

/// Parse the level markers, returning how many `|` they contain.
fn level<'src>(input: &mut &'src str) -> IResult<usize> {
    take_while(0.., |c: char| c == LEVEL_MARKER || c == ' ' || c == '\t')
        .map(|prefix: &str| prefix.chars().filter(|&c| c == LEVEL_MARKER).count())
        .parse_next(input)
}

/// Parse the `+--` separator.
fn separator<'src>(input: &mut &'src str) -> IResult<&'src str> {
    literal(SEPARATOR).parse_next(input)
}

/// Parse a whole tree line into `(level, text)`.
fn tree_line<'src>(input: &mut &'src str) -> IResult<(usize, &'src str)> {
    let level = level(input)?;
    separator(input)?;

    let rest: &'src str = *input;
    *input = &rest[rest.len()..];

    Ok((level, rest.trim()))
}
