//! Tree builder.
//!
//! Turns the decomposed tree lines of an export into a [`GrammarTree`]. The
//! builder keeps an insertion cursor: an expression becomes the new cursor
//! once inserted, a terminal leaves the cursor on its parent.

use log::{debug, trace};

use structogram_core::grammar::{GrammarNode, GrammarTree, InsertError, NodeId};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    lexer::{SourceLine, split_tree_line},
};

/// Build a grammar tree from the lines of a tree section.
///
/// # Errors
///
/// Returns the diagnostic for the first structural violation:
/// - `E104` when there are no lines,
/// - `E100` when the first line is not at level 0,
/// - `E101` when the first line is not an expression,
/// - `E102` when a later line is not deeper than the root,
/// - `E103` when a line is malformed.
pub(crate) fn build_tree<'src, I>(lines: I) -> Result<GrammarTree>
where
    I: IntoIterator<Item = SourceLine<'src>>,
{
    let mut lines = lines.into_iter();

    let Some(first) = lines.next() else {
        return Err(Diagnostic::error("no parse tree found")
            .with_code(ErrorCode::E104)
            .with_help("the tree follows the header block after the first blank line"));
    };

    let root_line = split_tree_line(first)?;

    if root_line.level != 0 {
        return Err(Diagnostic::error("parse tree root is not at level 0")
            .with_code(ErrorCode::E100)
            .with_label(
                root_line.span,
                format!("found at level {}", root_line.level),
            )
            .with_help("the first tree line must start with `+--`"));
    }

    let root = GrammarNode::classify(root_line.level, root_line.text);
    if !root.is_expression() {
        return Err(Diagnostic::error("parse tree root is not an expression")
            .with_code(ErrorCode::E101)
            .with_label(root_line.span, "found a terminal")
            .with_help("the root line must name a production such as `<program>`"));
    }

    debug!(root = root.text(); "Building parse tree");

    let mut tree = GrammarTree::new(root);
    let mut cursor = tree.root();

    for line in lines {
        let tree_line = split_tree_line(line)?;
        let node = GrammarNode::classify(tree_line.level, tree_line.text);
        let is_expression = node.is_expression();

        let inserted = tree.insert(cursor, node).map_err(|err| match err {
            InsertError::AboveRoot { level } => {
                Diagnostic::error("parse tree has more than one root")
                    .with_code(ErrorCode::E102)
                    .with_label(tree_line.span, format!("node at level {level} has no parent"))
                    .with_secondary_label(root_line.span, "tree root is here")
                    .with_help("every line after the root must be nested below it")
            }
        })?;

        let Some(id) = inserted else {
            continue;
        };

        trace!(node:% = id, level = tree_line.level, text = tree_line.text; "Inserted node");

        cursor = next_cursor(&tree, id, is_expression);
    }

    debug!(nodes = tree.len(); "Parse tree built");

    Ok(tree)
}

/// An expression receives the lines that follow it; a terminal does not.
fn next_cursor(tree: &GrammarTree, id: NodeId, is_expression: bool) -> NodeId {
    if is_expression {
        return id;
    }
    tree.node(id).parent().unwrap_or(id)
}
