//! Diagram tree.
//!
//! A [`Diagram`] mirrors a [`GrammarTree`]: one [`Statement`] per grammar
//! node, in the same order, stored in an arena and linked by
//! [`StatementId`]. Each statement has a [`StatementKind`] chosen by the
//! [`StatementFactory`] and a set of named text buffers that the build pass
//! fills.
//!
//! # Text propagation
//!
//! Text is appended with [`Diagram::add_text`], which walks the parent chain
//! from a starting statement until it finds one that declares the requested
//! [`Field`]. Text that reaches past the root is dropped.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use structogram_core::grammar::{GrammarTree, NodeId};

use crate::factory::StatementFactory;

/// Index of a statement inside its [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(usize);

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Named text buffers a statement can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Instruction,
    ForControl,
    ForFrom,
    ForTo,
    ForStep,
    Control,
    Branches,
    Comments,
    Condition,
    Assignments,
    /// Sink for the text of nested statements, so that keywords inside a
    /// body never reach the header of the enclosing construct.
    Body,
}

impl Field {
    /// Returns the field name as it appears in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instruction => "instruction",
            Self::ForControl => "for_control",
            Self::ForFrom => "for_from",
            Self::ForTo => "for_to",
            Self::ForStep => "for_step",
            Self::Control => "control",
            Self::Branches => "branches",
            Self::Comments => "comments",
            Self::Condition => "condition",
            Self::Assignments => "assignments",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an exit leaves the current module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpScope {
    Internal,
    External,
}

/// Color family of a conditional loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhileFlavor {
    Conditional,
    /// Loops over database records.
    Database,
}

/// What a multi-way branch selects on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseSelector {
    /// Branches compare against the value of an operand (`DECIDE ON`).
    Value,
    /// Every branch carries its own condition (`DECIDE FOR`).
    Condition,
}

/// Diagram variant of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Document,
    Instruction,
    Call,
    Jump(JumpScope),
    ForLoop,
    ForeverLoop,
    WhileLoop(WhileFlavor),
    Alternative,
    TrueBranch,
    FalseBranch,
    CaseHeader(CaseSelector),
    CaseBranch,
    NoneBranch,
    ConditionAggregator,
    DatabaseStatement,
    AssignmentLine,
    NullStatement,
    Terminal,
    /// Pass-through for productions without a diagram counterpart.
    Statement,
}

impl StatementKind {
    /// Fields declared by statements of this kind.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Document
            | Self::Instruction
            | Self::Call
            | Self::Jump(_)
            | Self::TrueBranch
            | Self::FalseBranch
            | Self::AssignmentLine
            | Self::NullStatement => &[Field::Instruction],
            Self::ForLoop => &[
                Field::Instruction,
                Field::ForControl,
                Field::ForFrom,
                Field::ForTo,
                Field::ForStep,
                Field::Body,
            ],
            Self::ForeverLoop => &[Field::Body],
            Self::WhileLoop(_) | Self::Alternative => &[Field::Instruction, Field::Body],
            Self::CaseHeader(_) => &[
                Field::Control,
                Field::Branches,
                Field::Comments,
                Field::Body,
            ],
            Self::CaseBranch | Self::NoneBranch => &[Field::Instruction, Field::Condition],
            Self::ConditionAggregator => &[Field::Condition],
            Self::DatabaseStatement => &[Field::Instruction, Field::Assignments],
            Self::Terminal | Self::Statement => &[],
        }
    }

    /// Returns `true` for the two arms of an alternative.
    pub fn is_branch(self) -> bool {
        matches!(self, Self::TrueBranch | Self::FalseBranch)
    }
}

/// One node of the diagram tree.
#[derive(Debug, Clone)]
pub struct Statement {
    kind: StatementKind,
    origin: NodeId,
    parent: Option<StatementId>,
    children: Vec<StatementId>,
    text: IndexMap<Field, Vec<String>>,
    body_start: usize,
}

impl Statement {
    fn new(kind: StatementKind, origin: NodeId, parent: Option<StatementId>) -> Self {
        let text = kind
            .fields()
            .iter()
            .map(|&field| (field, Vec::new()))
            .collect();

        Self {
            kind,
            origin,
            parent,
            children: Vec::new(),
            text,
            body_start: 0,
        }
    }

    /// The diagram variant.
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Grammar node this statement was created from.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Parent statement, `None` for the document root.
    pub fn parent(&self) -> Option<StatementId> {
        self.parent
    }

    /// Child statements, in grammar order.
    pub fn children(&self) -> &[StatementId] {
        &self.children
    }

    /// Returns `true` if this statement declares `field`.
    pub fn declares(&self, field: Field) -> bool {
        self.text.contains_key(&field)
    }

    /// Collected text of `field`; empty when the field is not declared.
    pub fn text(&self, field: Field) -> &[String] {
        self.text.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Collected text of `field`, joined with single spaces.
    pub fn joined(&self, field: Field) -> String {
        self.text(field).join(" ")
    }

    /// Children rendered inside the construct's body wrapper.
    pub fn body(&self) -> &[StatementId] {
        self.children.get(self.body_start..).unwrap_or_default()
    }

    pub(crate) fn set_body_start(&mut self, index: usize) {
        self.body_start = index;
    }
}

/// Arena holding the statements of one diagram.
#[derive(Debug, Clone)]
pub struct Diagram {
    statements: Vec<Statement>,
    root: StatementId,
}

impl Diagram {
    /// Create one statement per grammar node of `tree`.
    ///
    /// The root statement is always a [`StatementKind::Document`]. When the
    /// grammar root maps to another variant, a document is placed above it.
    pub fn import(tree: &GrammarTree, factory: &StatementFactory) -> Self {
        let grammar_root = tree.root();
        let root_kind = factory.statement_for(tree.node(grammar_root));

        let mut diagram = Self {
            statements: Vec::with_capacity(tree.len() + 1),
            root: StatementId(0),
        };

        let top = if root_kind == StatementKind::Document {
            diagram.push(StatementKind::Document, grammar_root, None)
        } else {
            debug!(kind:? = root_kind; "Wrapping grammar root in a document");
            let document = diagram.push(StatementKind::Document, grammar_root, None);
            diagram.push(root_kind, grammar_root, Some(document))
        };

        let mut pending = vec![(grammar_root, top)];
        while let Some((node, statement)) = pending.pop() {
            for &child in tree.children(node) {
                let kind = factory.statement_for(tree.node(child));
                let id = diagram.push(kind, child, Some(statement));
                trace!(statement:% = id, node:% = child, kind:? = kind; "Imported statement");
                pending.push((child, id));
            }
        }

        diagram
    }

    /// The document statement.
    pub fn root(&self) -> StatementId {
        self.root
    }

    /// Returns the statement for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this diagram.
    pub fn statement(&self, id: StatementId) -> &Statement {
        &self.statements[id.0]
    }

    pub(crate) fn statement_mut(&mut self, id: StatementId) -> &mut Statement {
        &mut self.statements[id.0]
    }

    /// Child statements of `id`.
    pub fn children(&self, id: StatementId) -> &[StatementId] {
        self.statement(id).children()
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// A diagram always holds its document, so this only reports `false`.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Append `value` to `field` of the nearest statement, starting at
    /// `start` and walking up, that declares the field.
    ///
    /// Returns the statement that received the text, or `None` when no
    /// statement on the way to the root declares `field`.
    pub fn add_text(
        &mut self,
        start: StatementId,
        field: Field,
        value: impl Into<String>,
    ) -> Option<StatementId> {
        let value = value.into();
        let mut current = Some(start);

        while let Some(id) = current {
            let statement = self.statement_mut(id);
            if let Some(buffer) = statement.text.get_mut(&field) {
                buffer.push(value);
                return Some(id);
            }
            current = statement.parent;
        }

        trace!(field:% = field, value; "Dropping text with no receiving statement");
        None
    }

    fn push(
        &mut self,
        kind: StatementKind,
        origin: NodeId,
        parent: Option<StatementId>,
    ) -> StatementId {
        let id = StatementId(self.statements.len());
        self.statements.push(Statement::new(kind, origin, parent));

        if let Some(parent) = parent {
            self.statement_mut(parent).children.push(id);
        }
        id
    }
}
