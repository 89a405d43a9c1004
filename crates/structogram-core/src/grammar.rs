//! Grammar tree model.
//!
//! A parse tree export describes a derivation tree: non-terminal
//! productions ([`GrammarNodeKind::Expression`]) that own ordered children,
//! and literal tokens ([`GrammarNodeKind::Terminal`]) at the leaves.
//!
//! All nodes of one tree live in a single arena ([`GrammarTree`]) and refer
//! to each other by [`NodeId`]. The parent link is a plain index, so a tree
//! has no reference cycles and can be walked in either direction.
//!
//! # Example
//!
//! ```
//! use structogram_core::grammar::{GrammarNode, GrammarTree};
//!
//! let mut tree = GrammarTree::new(GrammarNode::expression(0, "<ADD> ::= ADD <operand>"));
//! let root = tree.root();
//! tree.insert(root, GrammarNode::terminal(1, "ADD")).unwrap();
//!
//! assert_eq!(tree.node(root).lvalue(), Some("ADD"));
//! assert_eq!(tree.children(root).len(), 1);
//! ```

use std::fmt;

use log::trace;

/// Separator between the left-hand side and the body of a production.
const PRODUCTION_SEPARATOR: &str = "::=";

/// Index of a node inside its [`GrammarTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two kinds of grammar node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarNodeKind {
    /// A non-terminal production with its derived children, in order.
    Expression { children: Vec<NodeId> },
    /// A literal token.
    Terminal,
}

/// A single node of the derivation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarNode {
    level: usize,
    text: String,
    parent: Option<NodeId>,
    kind: GrammarNodeKind,
}

impl GrammarNode {
    /// Create an expression (non-terminal) node.
    pub fn expression(level: usize, text: impl Into<String>) -> Self {
        Self::new(
            level,
            text,
            GrammarNodeKind::Expression {
                children: Vec::new(),
            },
        )
    }

    /// Create a terminal (leaf) node.
    pub fn terminal(level: usize, text: impl Into<String>) -> Self {
        Self::new(level, text, GrammarNodeKind::Terminal)
    }

    /// Create a node whose kind is decided by its text.
    ///
    /// Text starting with `<` names a production and becomes an expression,
    /// except a lone `<`, which is the less-than token.
    ///
    /// # Examples
    ///
    /// ```
    /// use structogram_core::grammar::GrammarNode;
    ///
    /// assert!(GrammarNode::classify(1, "<IF_open> ::= IF <logical>").is_expression());
    /// assert!(GrammarNode::classify(2, "<").is_terminal());
    /// assert!(GrammarNode::classify(2, "#COUNTER").is_terminal());
    /// ```
    pub fn classify(level: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.starts_with('<') && text != "<" {
            Self::expression(level, text)
        } else {
            Self::terminal(level, text)
        }
    }

    /// Depth of the node in the indentation tree.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Raw text of the line: a production for expressions, the token for terminals.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node kind.
    pub fn kind(&self) -> &GrammarNodeKind {
        &self.kind
    }

    /// Returns `true` for expression nodes.
    pub fn is_expression(&self) -> bool {
        matches!(self.kind, GrammarNodeKind::Expression { .. })
    }

    /// Returns `true` for terminal nodes.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, GrammarNodeKind::Terminal)
    }

    /// Children of the node; always empty for terminals.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            GrammarNodeKind::Expression { children } => children,
            GrammarNodeKind::Terminal => &[],
        }
    }

    /// Name of the production on the left-hand side of an expression.
    ///
    /// `<FOR> ::= FOR <variable> <FOR_from>` yields `FOR`. Terminals have no
    /// left-hand side.
    pub fn lvalue(&self) -> Option<&str> {
        if self.is_terminal() {
            return None;
        }

        let head = self
            .text
            .split(PRODUCTION_SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim();
        let head = head.strip_prefix('<').unwrap_or(head);
        Some(head.strip_suffix('>').unwrap_or(head))
    }

    /// Returns `true` if this is an expression for `production`.
    pub fn matches(&self, production: &str) -> bool {
        self.lvalue() == Some(production)
    }

    fn new(level: usize, text: impl Into<String>, kind: GrammarNodeKind) -> Self {
        Self {
            level,
            text: text.into(),
            parent: None,
            kind,
        }
    }
}

/// Reasons an insertion can be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The node is not deeper than the root, so no ancestor can hold it.
    AboveRoot { level: usize },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AboveRoot { level } => {
                write!(f, "node at level {level} has no ancestor to attach to")
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// Arena holding every node of one derivation tree.
///
/// The root is always the first node. Nodes are stored in insertion order,
/// which for a tree built from an export is document (pre-)order.
#[derive(Debug, Clone)]
pub struct GrammarTree {
    nodes: Vec<GrammarNode>,
}

impl GrammarTree {
    /// Create a tree holding only `root`.
    pub fn new(mut root: GrammarNode) -> Self {
        root.parent = None;
        Self { nodes: vec![root] }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &GrammarNode {
        &self.nodes[id.0]
    }

    /// Children of `id`, in derivation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root, so this only reports `false`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GrammarNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Insert `child` relative to the insertion cursor.
    ///
    /// If the child is deeper than `cursor` it becomes the cursor's last
    /// child. Otherwise the insertion is retried at the cursor's parent,
    /// climbing until an ancestor with a smaller level is found.
    ///
    /// Returns the id of the inserted node, or `None` when the node that
    /// would receive the child is a terminal (terminals take no children and
    /// the child is dropped).
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::AboveRoot`] when the climb passes the root.
    pub fn insert(
        &mut self,
        cursor: NodeId,
        child: GrammarNode,
    ) -> Result<Option<NodeId>, InsertError> {
        let level = child.level;
        let mut target = cursor;

        while level <= self.node(target).level {
            target = self
                .node(target)
                .parent
                .ok_or(InsertError::AboveRoot { level })?;
        }

        Ok(self.add_child(target, child))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Terminals take no children; adding to one is a no-op returning `None`.
    fn add_child(&mut self, parent: NodeId, mut child: GrammarNode) -> Option<NodeId> {
        if self.node(parent).is_terminal() {
            trace!(parent:% = parent, text = child.text(); "Dropping child of terminal node");
            return None;
        }

        let id = NodeId(self.nodes.len());
        child.parent = Some(parent);
        self.nodes.push(child);

        if let GrammarNodeKind::Expression { children } = &mut self.nodes[parent.0].kind {
            children.push(id);
        }

        Some(id)
    }
}
