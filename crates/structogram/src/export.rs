//! Structorizer export.
//!
//! The render pass writes a built [`Diagram`] as a Structorizer `.nsd`
//! document. It walks the diagram top-down, so every opening tag is written
//! before the markup of the children and every closing tag after it.
//!
//! # Output shape
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root ... text="PROGRAM" ...>
//!   <children>
//! <instruction text="MOVE 1 TO #COUNTER" comment="" color="ffffff" rotated="0" disabled="0">
//! </instruction>
//! <while text="READ EMPLOYEES" comment="" color="80ff80">
//!   <qWhile>
//!   </qWhile>
//! </while>
//!   </children>
//! </root>
//! ```
//!
//! # Escaping
//!
//! Plain attribute values escape `&`, `<`, `>` and `"` ([`escape_attribute`]).
//! Multi-line values such as case headers and database statements are
//! written as comma text ([`comma_text`]): every line is wrapped in `&#34;`
//! and quotes inside a line are doubled.

use std::{
    borrow::Cow,
    io::{self, Write},
};

use time::{Date, OffsetDateTime};

use structogram_core::color::Color;

use crate::diagram::{
    Diagram, Field, JumpScope, Statement, StatementId, StatementKind, WhileFlavor,
};

/// Structorizer file format version written into the root element.
const FORMAT_VERSION: &str = "3.30-12";

/// Preference attributes Structorizer expects on the root element.
const ROOT_PREFERENCES: &str = concat!(
    r#"preRepeat="until " postFor="to" preReturn="return" postForIn="in" "#,
    r#"preWhile="while " output="OUTPUT" input="INPUT" preFor="for" "#,
    r#"preExit="exit" preLeave="leave" ignoreCase="true" preThrow="throw" "#,
    r#"preForIn="foreach" stepFor="by""#,
);

/// Colors of the element families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Ordinary statements and the document.
    pub default: Color,
    /// Exits that stay inside the module.
    pub jump: Color,
    /// Exits that leave the module.
    pub external_jump: Color,
    /// Database statements and loops.
    pub database: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            default: Color::WHITE,
            jump: Color::from_rgb8(0xff, 0xff, 0x80),
            external_jump: Color::from_rgb8(0xff, 0x80, 0x80),
            database: Color::from_rgb8(0x80, 0xff, 0x80),
        }
    }
}

/// Document metadata and colors used while rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    author: String,
    program_name: String,
    origin: String,
    created: Date,
    palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            author: String::new(),
            program_name: "PROGRAM".to_string(),
            origin: "Structogram".to_string(),
            created: OffsetDateTime::now_utc().date(),
            palette: Palette::default(),
        }
    }
}

impl RenderOptions {
    /// Set the author written into the document.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the program name shown as the diagram title.
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Set the origin tool recorded in the document.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set the creation date; defaults to today (UTC).
    pub fn with_created(mut self, created: Date) -> Self {
        self.created = created;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn created(&self) -> Date {
        self.created
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// Write `diagram` as a complete Structorizer document.
pub(crate) fn render<W: Write>(
    diagram: &Diagram,
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<()> {
    Renderer {
        diagram,
        options,
        writer,
    }
    .render(diagram.root())
}

/// Write the subtree of `id` without the document wrapper unless `id` is
/// the document itself.
#[cfg(test)]
pub(crate) fn render_statement<W: Write>(
    diagram: &Diagram,
    id: StatementId,
    options: &RenderOptions,
    writer: &mut W,
) -> io::Result<()> {
    Renderer {
        diagram,
        options,
        writer,
    }
    .render(id)
}

struct Renderer<'a, W> {
    diagram: &'a Diagram,
    options: &'a RenderOptions,
    writer: &'a mut W,
}

impl<W: Write> Renderer<'_, W> {
    fn render(&mut self, id: StatementId) -> io::Result<()> {
        let diagram = self.diagram;
        let statement = diagram.statement(id);
        let palette = self.options.palette;

        match statement.kind() {
            StatementKind::Document => {
                self.open_document()?;
                self.render_all(statement.children())?;
                writeln!(self.writer, "  </children>")?;
                writeln!(self.writer, "</root>")
            }
            StatementKind::Instruction => {
                let text = escape_attribute(&statement.joined(Field::Instruction)).into_owned();
                self.leaf("instruction", &text, palette.default)
            }
            StatementKind::Call => {
                let text = escape_attribute(&statement.joined(Field::Instruction)).into_owned();
                self.leaf("call", &text, palette.default)
            }
            StatementKind::Jump(scope) => {
                let color = match scope {
                    JumpScope::Internal => palette.jump,
                    JumpScope::External => palette.external_jump,
                };
                let text = escape_attribute(&statement.joined(Field::Instruction)).into_owned();
                self.leaf("jump", &text, color)
            }
            StatementKind::DatabaseStatement => {
                let mut lines = vec![statement.joined(Field::Instruction)];
                lines.extend(
                    statement
                        .text(Field::Assignments)
                        .iter()
                        .map(|assignment| format!("  {assignment}")),
                );
                self.leaf("instruction", &comma_text(&lines), palette.database)
            }
            StatementKind::ForLoop => {
                let text = for_header(statement);
                writeln!(
                    self.writer,
                    r#"<for text="{text}" comment="" color="{}">"#,
                    palette.default
                )?;
                self.wrapped("  <qFor>", statement.body(), "  </qFor>")?;
                writeln!(self.writer, "</for>")
            }
            StatementKind::ForeverLoop => {
                writeln!(
                    self.writer,
                    r#"<forever comment="" color="{}">"#,
                    palette.default
                )?;
                self.wrapped("  <qForever>", statement.children(), "  </qForever>")?;
                writeln!(self.writer, "</forever>")
            }
            StatementKind::WhileLoop(flavor) => {
                let color = match flavor {
                    WhileFlavor::Conditional => palette.default,
                    WhileFlavor::Database => palette.database,
                };
                let text = escape_attribute(&statement.joined(Field::Instruction)).into_owned();
                writeln!(
                    self.writer,
                    r#"<while text="{text}" comment="" color="{color}">"#
                )?;
                self.wrapped("  <qWhile>", statement.body(), "  </qWhile>")?;
                writeln!(self.writer, "</while>")
            }
            StatementKind::Alternative => self.render_alternative(statement),
            StatementKind::TrueBranch => {
                self.wrapped("<qTrue>", statement.children(), "</qTrue>")
            }
            StatementKind::FalseBranch => {
                self.wrapped("<qFalse>", statement.children(), "</qFalse>")
            }
            StatementKind::CaseHeader(_) => {
                let mut entries = vec![statement.joined(Field::Control)];
                entries.extend(statement.text(Field::Branches).iter().cloned());
                let comment = escape_attribute(&statement.joined(Field::Comments)).into_owned();

                writeln!(
                    self.writer,
                    r#"<case text="{}" comment="{comment}" color="{}">"#,
                    comma_text(&entries),
                    palette.default
                )?;
                self.render_all(statement.body())?;
                writeln!(self.writer, "</case>")
            }
            StatementKind::CaseBranch | StatementKind::NoneBranch => {
                self.wrapped("<qCase>", statement.children(), "</qCase>")
            }
            StatementKind::Statement => self.render_all(statement.children()),
            StatementKind::ConditionAggregator
            | StatementKind::AssignmentLine
            | StatementKind::NullStatement
            | StatementKind::Terminal => Ok(()),
        }
    }

    fn render_all(&mut self, children: &[StatementId]) -> io::Result<()> {
        for &child in children {
            self.render(child)?;
        }
        Ok(())
    }

    /// Write `open`, the children, then `close`, each tag on its own line.
    fn wrapped(&mut self, open: &str, children: &[StatementId], close: &str) -> io::Result<()> {
        writeln!(self.writer, "{open}")?;
        self.render_all(children)?;
        writeln!(self.writer, "{close}")
    }

    /// Write an element without children. `text` must already be escaped.
    fn leaf(&mut self, tag: &str, text: &str, color: Color) -> io::Result<()> {
        writeln!(
            self.writer,
            r#"<{tag} text="{text}" comment="" color="{color}" rotated="0" disabled="0">"#
        )?;
        writeln!(self.writer, "</{tag}>")
    }

    fn render_alternative(&mut self, statement: &Statement) -> io::Result<()> {
        let condition = format!("({})", statement.joined(Field::Instruction));
        writeln!(
            self.writer,
            r#"<alternative text="{}" comment="" color="{}">"#,
            escape_attribute(&condition),
            self.options.palette.default
        )?;

        let body = statement.body();
        let has_branch = |kind: StatementKind| {
            body.iter()
                .any(|&child| self.diagram.statement(child).kind() == kind)
        };
        let (has_true, has_false) = (
            has_branch(StatementKind::TrueBranch),
            has_branch(StatementKind::FalseBranch),
        );

        // Structorizer requires both arms.
        if !has_true {
            self.wrapped("<qTrue>", &[], "</qTrue>")?;
        }
        self.render_all(body)?;
        if !has_false {
            self.wrapped("<qFalse>", &[], "</qFalse>")?;
        }

        writeln!(self.writer, "</alternative>")
    }

    fn open_document(&mut self) -> io::Result<()> {
        let options = self.options;

        writeln!(self.writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            self.writer,
            concat!(
                r#"<root xmlns:nsd="https://structorizer.fisch.lu" version="{version}" {preferences} "#,
                r#"author="{author}" created="{created}" changedby="" changed="" origin="{origin}" "#,
                r#"text="{name}" comment="" color="{color}" type="program" style="nice">"#
            ),
            version = FORMAT_VERSION,
            preferences = ROOT_PREFERENCES,
            author = escape_attribute(options.author()),
            created = options.created(),
            origin = escape_attribute(options.origin()),
            name = escape_attribute(options.program_name()),
            color = options.palette.default,
        )?;
        writeln!(self.writer, "  <children>")
    }
}

/// Header text of a counted loop: `FOR #J <- 1 to 10 by 2`.
fn for_header(statement: &Statement) -> String {
    let field = |field| escape_attribute(&statement.joined(field)).into_owned();

    let mut text = format!(
        "{} {} &#60;- {} to {}",
        field(Field::Instruction),
        field(Field::ForControl),
        field(Field::ForFrom),
        field(Field::ForTo),
    );

    let step = field(Field::ForStep);
    if !step.is_empty() {
        text.push_str(" by ");
        text.push_str(&step);
    }
    text
}

/// Escape `&`, `<`, `>` and `"` for use inside a double-quoted attribute.
///
/// # Examples
///
/// ```
/// use structogram::export::escape_attribute;
///
/// assert_eq!(escape_attribute("#A < 5"), "#A &lt; 5");
/// assert_eq!(escape_attribute("MOVE 1 TO #A"), "MOVE 1 TO #A");
/// ```
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Encode several lines as one Structorizer comma text attribute value.
///
/// # Examples
///
/// ```
/// use structogram::export::comma_text;
///
/// assert_eq!(
///     comma_text(&["STORE", "  NAME := \"X\""]),
///     "&#34;STORE&#34;,&#34;  NAME := &#34;&#34;X&#34;&#34;&#34;"
/// );
/// ```
pub fn comma_text<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| {
            let mut quoted = String::from("&#34;");
            for c in line.as_ref().chars() {
                match c {
                    '&' => quoted.push_str("&amp;"),
                    '<' => quoted.push_str("&lt;"),
                    '>' => quoted.push_str("&gt;"),
                    '"' => quoted.push_str("&#34;&#34;"),
                    _ => quoted.push(c),
                }
            }
            quoted.push_str("&#34;");
            quoted
        })
        .collect::<Vec<_>>()
        .join(",")
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::build::built;

    // ===================
    // Strategies
    // ===================

    /// A generated grammar subtree: production (or terminal text) and children.
    #[derive(Debug, Clone)]
    struct Node {
        text: String,
        children: Vec<Node>,
    }

    const PRODUCTIONS: &[&str] = &[
        "<MOVE>",
        "<PERFORM>",
        "<ESCAPE>",
        "<FETCH>",
        "<FOR>",
        "<REPEAT>",
        "<READ>",
        "<REPEAT_WHILE>",
        "<IF_open>",
        "<THEN_open>",
        "<ELSE_closed>",
        "<DECIDE_ON>",
        "<DECIDE_FOR>",
        "<DECIDE_ON_branch>",
        "<DECIDE_ON_none>",
        "<DECIDE_ON_condition>",
        "<STORE>",
        "<STORE_source>",
        "<assignment_all>",
        "<REDEFINE>",
        "<loop_statement_list>",
        "<statement_list>",
        "<operand>",
    ];

    fn leaf_strategy() -> impl Strategy<Value = Node> {
        prop_oneof![
            "[A-Z#][A-Z0-9-]{0,6}".prop_map(|text| Node {
                text,
                children: Vec::new(),
            }),
            prop::sample::select(PRODUCTIONS).prop_map(|text| Node {
                text: text.to_string(),
                children: Vec::new(),
            }),
        ]
    }

    fn tree_strategy() -> impl Strategy<Value = Node> {
        leaf_strategy().prop_recursive(5, 64, 6, |inner| {
            (
                prop::sample::select(PRODUCTIONS),
                prop::collection::vec(inner, 0..6),
            )
                .prop_map(|(text, children)| Node {
                    text: text.to_string(),
                    children,
                })
        })
    }

    fn decide_strategy() -> impl Strategy<Value = (Vec<usize>, bool)> {
        (prop::collection::vec(0usize..4, 0..6), any::<bool>())
    }

    fn push_lines(node: &Node, level: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}+--{}", "|  ".repeat(level), node.text));
        for child in &node.children {
            push_lines(child, level + 1, lines);
        }
    }

    fn render_lines(lines: &[String]) -> String {
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let diagram = built(&lines);

        let mut output = Vec::new();
        render(&diagram, &RenderOptions::default(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    /// Name of the element opened or closed on an output line.
    fn tag(line: &str) -> Option<(bool, &str)> {
        let line = line.trim();
        let (closing, rest) = match line.strip_prefix("</") {
            Some(rest) => (true, rest),
            None => (false, line.strip_prefix('<')?),
        };
        let end = rest.find([' ', '>']).unwrap_or(rest.len());
        Some((closing, &rest[..end]))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every element opened in the output is closed in reverse order.
    fn check_tags_balanced(node: &Node) -> Result<(), TestCaseError> {
        let mut lines = vec!["+--<program>".to_string()];
        push_lines(node, 1, &mut lines);
        let output = render_lines(&lines);

        let mut open = Vec::new();
        for line in output.lines().skip(1) {
            let Some((closing, name)) = tag(line) else {
                return Err(TestCaseError::fail(format!("not a tag line: {line}")));
            };
            if closing {
                prop_assert_eq!(open.pop(), Some(name), "in output:\n{}", output);
            } else {
                open.push(name);
            }
        }
        prop_assert!(open.is_empty(), "unclosed {:?} in output:\n{}", open, output);
        Ok(())
    }

    /// A decision header lists one entry per branch, after the control entry.
    fn check_decide_entries(values: &[usize], with_none: bool) -> Result<(), TestCaseError> {
        let mut lines = vec![
            "+--<DECIDE_ON>".to_string(),
            "|  +--DECIDE".to_string(),
            "|  +--ON".to_string(),
            "|  +--#CODE".to_string(),
        ];
        for (branch, &count) in values.iter().enumerate() {
            lines.push("|  +--<DECIDE_ON_branch>".to_string());
            lines.push("|  |  +--VALUE".to_string());
            lines.push("|  |  +--<DECIDE_ON_condition>".to_string());
            for value in 0..count {
                lines.push(format!("|  |  |  +--V{branch}X{value}"));
            }
        }
        if with_none {
            lines.push("|  +--<DECIDE_ON_none>".to_string());
            lines.push("|  |  +--NONE".to_string());
        }
        let output = render_lines(&lines);

        let header = output
            .lines()
            .find(|line| line.starts_with("<case "))
            .ok_or_else(|| TestCaseError::fail("no case element"))?;
        let text = header
            .split("text=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap_or_default();

        let entries = text.split(',').count();
        let arms = output.lines().filter(|line| *line == "<qCase>").count();

        prop_assert_eq!(arms, values.len() + usize::from(with_none));
        prop_assert_eq!(entries, arms + 1);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn tags_are_balanced(node in tree_strategy()) {
            check_tags_balanced(&node)?;
        }

        #[test]
        fn decide_entries_match_arms((values, with_none) in decide_strategy()) {
            check_decide_entries(&values, with_none)?;
        }
    }
}
