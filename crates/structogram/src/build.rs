//! Build pass.
//!
//! Walks a freshly imported [`Diagram`] and routes the text of every
//! terminal into the text buffers of the statements that display it. Each
//! statement kind decides which of its children feed which [`Field`]; the
//! terminals themselves only know the field they were asked to fill and
//! hand their text to [`Diagram::add_text`].

use log::trace;

use structogram_core::grammar::GrammarTree;

use crate::diagram::{CaseSelector, Diagram, Field, StatementId, StatementKind};

/// Production holding the statements of a loop body.
const LOOP_BODY: &str = "loop_statement_list";

/// Header condition of `DECIDE FOR`, where each branch tests its own condition.
const EVERY_CONDITION: &str = "*";

/// Condition reported by the fallback branch of a decision.
const NONE_CONDITION: &str = "NONE";

/// Marker production suffixes that open the assignment part of a database
/// statement.
const DATABASE_MARKERS: [&str; 2] = ["_source", "_how"];

/// Run the build pass over the whole diagram.
pub(crate) fn build(diagram: &mut Diagram, tree: &GrammarTree) {
    let root = diagram.root();
    BuildPass { diagram, tree }.build(root, Field::Instruction);
}

struct BuildPass<'a> {
    diagram: &'a mut Diagram,
    tree: &'a GrammarTree,
}

impl BuildPass<'_> {
    fn build(&mut self, id: StatementId, field: Field) {
        let kind = self.diagram.statement(id).kind();

        match kind {
            StatementKind::Document | StatementKind::Statement => self.forward(id, field),
            StatementKind::Instruction
            | StatementKind::Call
            | StatementKind::Jump(_)
            | StatementKind::TrueBranch
            | StatementKind::FalseBranch
            | StatementKind::NullStatement => self.forward(id, Field::Instruction),
            StatementKind::ForeverLoop => self.forward(id, Field::Body),
            StatementKind::ForLoop => self.build_for_loop(id),
            StatementKind::WhileLoop(_) => self.build_while_loop(id),
            StatementKind::Alternative => self.build_alternative(id),
            StatementKind::CaseHeader(selector) => self.build_case_header(id, selector),
            StatementKind::CaseBranch => self.build_case_branch(id),
            StatementKind::NoneBranch => {
                self.report(id, Field::Branches, NONE_CONDITION.to_string());
                self.forward(id, Field::Instruction);
            }
            StatementKind::ConditionAggregator => self.aggregate(id, Field::Condition, field),
            StatementKind::AssignmentLine => self.aggregate(id, Field::Instruction, field),
            StatementKind::DatabaseStatement => self.build_database_statement(id),
            StatementKind::Terminal => {
                let origin = self.diagram.statement(id).origin();
                let text = self.tree.node(origin).text().to_string();
                self.report(id, field, text);
            }
        }
    }

    /// Build every child of `id` into `field`.
    fn forward(&mut self, id: StatementId, field: Field) {
        for child in self.children(id) {
            self.build(child, field);
        }
    }

    /// Hand `value` to the parent chain of `id`.
    fn report(&mut self, id: StatementId, field: Field, value: String) {
        match self.diagram.statement(id).parent() {
            Some(parent) => {
                self.diagram.add_text(parent, field, value);
            }
            None => trace!(statement:% = id, field:% = field; "Report from the root dropped"),
        }
    }

    /// Collect the children of `id` into `own`, then report them as a single
    /// line under `field`.
    fn aggregate(&mut self, id: StatementId, own: Field, field: Field) {
        self.forward(id, own);
        let joined = self.diagram.statement(id).joined(own);
        self.report(id, field, joined);
    }

    fn build_for_loop(&mut self, id: StatementId) {
        let children = self.children(id);
        let header = [
            Field::Instruction,
            Field::ForControl,
            Field::ForFrom,
            Field::ForTo,
        ];

        for (&child, field) in children.iter().zip(header) {
            self.build(child, field);
        }

        // The fifth child is either the body or a step clause.
        let mut body_start = header.len();
        if let Some(&fifth) = children.get(body_start) {
            if !self.matches(fifth, LOOP_BODY) {
                self.build(fifth, Field::ForStep);
                body_start += 1;
            }
        }

        self.build_body(id, &children, body_start);
    }

    fn build_while_loop(&mut self, id: StatementId) {
        let children = self.children(id);

        let body_start = children
            .iter()
            .position(|&child| self.matches(child, LOOP_BODY))
            .unwrap_or(children.len().saturating_sub(1));

        for &child in &children[..body_start] {
            self.build(child, Field::Instruction);
        }
        self.build_body(id, &children, body_start);
    }

    fn build_alternative(&mut self, id: StatementId) {
        let children = self.children(id);

        let body_start = children
            .iter()
            .skip(1)
            .position(|&child| self.diagram.statement(child).kind().is_branch())
            .map_or(children.len(), |position| position + 1);

        // The first child is the IF keyword.
        for &child in children.iter().take(body_start).skip(1) {
            self.build(child, Field::Instruction);
        }
        self.build_body(id, &children, body_start);
    }

    fn build_case_header(&mut self, id: StatementId, selector: CaseSelector) {
        let children = self.children(id);
        let production = self.production(id).unwrap_or_default().to_string();

        let body_start = children
            .iter()
            .position(|&child| self.is_case_arm(child, &production))
            .unwrap_or(children.len());
        let header = &children[..body_start];

        match selector {
            CaseSelector::Value => {
                if let Some((&control, comments)) = header.split_last() {
                    for &child in comments {
                        self.build(child, Field::Comments);
                    }
                    self.build(control, Field::Control);
                }
            }
            CaseSelector::Condition => {
                for &child in header {
                    self.build(child, Field::Comments);
                }
                self.diagram
                    .add_text(id, Field::Control, EVERY_CONDITION.to_string());
            }
        }

        self.diagram.statement_mut(id).set_body_start(body_start);
        for &child in &children[body_start..] {
            if self.diagram.statement(child).kind() != StatementKind::Terminal {
                self.build(child, Field::Body);
            }
        }
    }

    fn build_case_branch(&mut self, id: StatementId) {
        for (index, child) in self.children(id).into_iter().enumerate() {
            let field = if index == 1 {
                Field::Condition
            } else {
                Field::Instruction
            };
            self.build(child, field);
        }

        // Reported even when empty, so that every arm has a header entry.
        let condition = self.diagram.statement(id).joined(Field::Condition);
        self.report(id, Field::Branches, condition);
    }

    fn build_database_statement(&mut self, id: StatementId) {
        let children = self.children(id);

        let split = children
            .iter()
            .position(|&child| {
                self.production(child).is_some_and(|production| {
                    DATABASE_MARKERS
                        .iter()
                        .any(|marker| production.ends_with(marker))
                })
            })
            .unwrap_or(children.len());

        for (index, &child) in children.iter().enumerate() {
            let field = if index < split {
                Field::Instruction
            } else {
                Field::Assignments
            };
            self.build(child, field);
        }
    }

    fn build_body(&mut self, id: StatementId, children: &[StatementId], body_start: usize) {
        let body_start = body_start.min(children.len());
        self.diagram.statement_mut(id).set_body_start(body_start);

        for &child in &children[body_start..] {
            self.build(child, Field::Body);
        }
    }

    /// Returns `true` if `child` opens the branch list of a decision.
    fn is_case_arm(&self, child: StatementId, header_production: &str) -> bool {
        let kind = self.diagram.statement(child).kind();
        if matches!(kind, StatementKind::CaseBranch | StatementKind::NoneBranch) {
            return true;
        }

        self.production(child).is_some_and(|production| {
            production
                .strip_prefix(header_production)
                .is_some_and(|rest| rest.starts_with("_branch") || rest == "_none")
        })
    }

    fn children(&self, id: StatementId) -> Vec<StatementId> {
        self.diagram.children(id).to_vec()
    }

    fn production(&self, id: StatementId) -> Option<&str> {
        let origin = self.diagram.statement(id).origin();
        self.tree.node(origin).lvalue()
    }

    fn matches(&self, id: StatementId, production: &str) -> bool {
        self.production(id) == Some(production)
    }
}

/// Import and build a diagram from tree lines.
#[cfg(test)]
pub(crate) fn built(lines: &[&str]) -> Diagram {
    let tree = structogram_parser::parse_lines(lines.iter().copied()).unwrap();
    let mut diagram = Diagram::import(&tree, &crate::factory::StatementFactory::new());
    build(&mut diagram, &tree);
    diagram
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The statement created for the grammar root.
    fn top(diagram: &Diagram) -> StatementId {
        diagram.children(diagram.root())[0]
    }

    #[test]
    fn test_instruction_collects_terminals() {
        let diagram = built(&[
            "+--<MOVE> ::= MOVE <operand> TO <operand>",
            "|  +--MOVE",
            "|  +--<operand>",
            "|  |  +--1",
            "|  +--TO",
            "|  +--<operand>",
            "|  |  +--#COUNTER",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(
            statement.text(Field::Instruction),
            ["MOVE", "1", "TO", "#COUNTER"]
        );
    }

    #[test]
    fn test_for_loop_fields() {
        let diagram = built(&[
            "+--<FOR>",
            "|  +--FOR",
            "|  +--<user_identifier>",
            "|  |  +--#J",
            "|  +--<constant_integer_pos>",
            "|  |  +--1",
            "|  +--<user_identifier>",
            "|  |  +--C*SOMETHING",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Instruction), ["FOR"]);
        assert_eq!(statement.text(Field::ForControl), ["#J"]);
        assert_eq!(statement.text(Field::ForFrom), ["1"]);
        assert_eq!(statement.text(Field::ForTo), ["C*SOMETHING"]);
        assert!(statement.text(Field::ForStep).is_empty());
        assert!(statement.body().is_empty());
    }

    #[test]
    fn test_for_loop_fifth_child_is_step_unless_body() {
        let with_step = built(&[
            "+--<FOR>",
            "|  +--FOR",
            "|  +--#I",
            "|  +--1",
            "|  +--10",
            "|  +--<FOR_step> ::= STEP <operand>",
            "|  |  +--STEP",
            "|  |  +--2",
            "|  +--<loop_statement_list>",
            "|  |  +--END-FOR",
        ]);
        let statement = with_step.statement(top(&with_step));
        assert_eq!(statement.text(Field::ForStep), ["STEP", "2"]);
        assert_eq!(statement.text(Field::Body), ["END-FOR"]);
        assert_eq!(statement.body().len(), 1);

        let without_step = built(&[
            "+--<FOR>",
            "|  +--FOR",
            "|  +--#I",
            "|  +--1",
            "|  +--10",
            "|  +--<loop_statement_list>",
            "|  |  +--END-FOR",
        ]);
        let statement = without_step.statement(top(&without_step));
        assert!(statement.text(Field::ForStep).is_empty());
        assert_eq!(statement.body().len(), 1);
    }

    #[test]
    fn test_while_loop_header_stops_at_body() {
        let diagram = built(&[
            "+--<READ>",
            "|  +--RPT-GRP0314",
            "|  +--<loop_statement_list>",
            "|  |  +--LOOP",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Instruction), ["RPT-GRP0314"]);
        assert_eq!(statement.text(Field::Body), ["LOOP"]);
    }

    #[test]
    fn test_while_loop_without_body_list_uses_last_child() {
        let diagram = built(&[
            "+--<REPEAT_WHILE>",
            "|  +--WHILE",
            "|  +--#A",
            "|  +--<statement_list>",
            "|  |  +--<END>",
            "|  |  |  +--END",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Instruction), ["WHILE", "#A"]);
        assert_eq!(statement.body().len(), 1);
    }

    #[test]
    fn test_alternative_skips_keyword() {
        let diagram = built(&[
            "+--<IF_open>",
            "|  +--IF",
            "|  +--<logical_expression>",
            "|  |  +--#TEST",
            "|  |  +--EQ",
            "|  |  +--2",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Instruction), ["#TEST", "EQ", "2"]);
    }

    #[test]
    fn test_alternative_branches_keep_their_keywords() {
        let diagram = built(&[
            "+--<IF_open>",
            "|  +--IF",
            "|  +--#A",
            "|  +--<THEN_open>",
            "|  |  +--THEN",
            "|  |  +--<END>",
            "|  |  |  +--END",
            "|  +--END-IF",
        ]);

        let alternative = top(&diagram);
        let statement = diagram.statement(alternative);
        assert_eq!(statement.text(Field::Instruction), ["#A"]);
        assert_eq!(statement.text(Field::Body), ["END-IF"]);

        let branch = statement.body()[0];
        assert_eq!(diagram.statement(branch).text(Field::Instruction), ["THEN"]);
    }

    #[test]
    fn test_case_header_collects_branches_once() {
        let diagram = built(&[
            "+--<DECIDE_ON>",
            "|  +--DECIDE",
            "|  +--ON",
            "|  +--FIRST",
            "|  +--VALUE",
            "|  +--#CODE",
            "|  +--<DECIDE_ON_branch>",
            "|  |  +--VALUE",
            "|  |  +--<DECIDE_ON_condition>",
            "|  |  |  +--1",
            "|  |  |  +--2",
            "|  |  |  +--3",
            "|  +--<DECIDE_ON_branch>",
            "|  |  +--VALUE",
            "|  |  +--4",
            "|  +--<DECIDE_ON_none>",
            "|  |  +--NONE",
            "|  |  +--IGNORE",
            "|  +--END-DECIDE",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Control), ["#CODE"]);
        assert_eq!(
            statement.text(Field::Comments),
            ["DECIDE", "ON", "FIRST", "VALUE"]
        );
        assert_eq!(statement.text(Field::Branches), ["1 2 3", "4", "NONE"]);
    }

    #[test]
    fn test_decide_for_control_is_fixed() {
        let diagram = built(&[
            "+--<DECIDE_FOR>",
            "|  +--DECIDE",
            "|  +--FOR",
            "|  +--FIRST",
            "|  +--CONDITION",
            "|  +--<DECIDE_FOR_branches>",
            "|  |  +--<DECIDE_FOR_branch>",
            "|  |  |  +--WHEN",
            "|  |  |  +--<logical>",
            "|  |  |  |  +--#A",
            "|  |  |  |  +--GT",
            "|  |  |  |  +--5",
            "|  |  +--<DECIDE_FOR_branch>",
            "|  |  |  +--WHEN",
            "|  |  |  +--<logical>",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.text(Field::Control), ["*"]);
        assert_eq!(
            statement.text(Field::Comments),
            ["DECIDE", "FOR", "FIRST", "CONDITION"]
        );
        assert_eq!(statement.text(Field::Branches), ["#A GT 5", ""]);
    }

    #[test]
    fn test_database_statement_splits_at_marker() {
        let diagram = built(&[
            "+--<STORE>",
            "|  +--STORE",
            "|  +--EMPLOYEES-VIEW",
            "|  +--<STORE_source>",
            "|  |  +--<assignment_all>",
            "|  |  |  +--NAME",
            "|  |  |  +--:=",
            "|  |  |  +--'SMITH'",
            "|  |  +--<assignment_all>",
            "|  |  |  +--AGE",
            "|  |  |  +--:=",
            "|  |  |  +--42",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(
            statement.text(Field::Instruction),
            ["STORE", "EMPLOYEES-VIEW"]
        );
        assert_eq!(
            statement.text(Field::Assignments),
            ["NAME := 'SMITH'", "AGE := 42"]
        );
    }

    #[test]
    fn test_database_statement_splits_at_how_marker() {
        let diagram = built(&[
            "+--<UPDATE>",
            "|  +--UPDATE",
            "|  +--RECORD",
            "|  +--<UPDATE_how>",
            "|  |  +--SAME",
            "|  |  +--<assignment_all>",
            "|  |  |  +--SALARY",
            "|  |  |  +--:=",
            "|  |  |  +--#NEW-SALARY",
        ]);

        let statement = diagram.statement(top(&diagram));
        assert_eq!(statement.kind(), StatementKind::DatabaseStatement);
        assert_eq!(statement.text(Field::Instruction), ["UPDATE", "RECORD"]);
        assert_eq!(
            statement.text(Field::Assignments),
            ["SAME", "SALARY := #NEW-SALARY"]
        );
    }

    #[test]
    fn test_null_statement_swallows_text() {
        let diagram = built(&[
            "+--<program>",
            "|  +--<REDEFINE>",
            "|  |  +--REDEFINE",
            "|  |  +--#A",
        ]);

        let root = diagram.statement(diagram.root());
        assert!(root.text(Field::Instruction).is_empty());

        let null = root.children()[0];
        assert_eq!(
            diagram.statement(null).text(Field::Instruction),
            ["REDEFINE", "#A"]
        );
    }
}
