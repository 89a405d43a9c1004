//! Production to diagram variant mapping.

use log::debug;

use structogram_core::grammar::GrammarNode;

use crate::diagram::{CaseSelector, JumpScope, StatementKind, WhileFlavor};

/// Chooses the diagram variant for each grammar node.
///
/// The mapping is keyed by the production name on the left-hand side of an
/// expression. Productions without an entry become pass-through
/// [`StatementKind::Statement`] nodes.
///
/// # Examples
///
/// ```
/// use structogram::{diagram::StatementKind, factory::StatementFactory};
///
/// let factory = StatementFactory::new();
/// assert_eq!(factory.lookup("MOVE"), StatementKind::Instruction);
/// assert_eq!(factory.lookup("operand"), StatementKind::Statement);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementFactory;

impl StatementFactory {
    pub fn new() -> Self {
        Self
    }

    /// Variant for an expression whose production is `production`.
    pub fn lookup(&self, production: &str) -> StatementKind {
        match production {
            "program" => StatementKind::Document,

            "ADD" | "ASSIGN" | "anon_ASSIGN" | "COMPRESS" | "COMPUTE" | "DEFINE_DATA"
            | "DEFINE_WINDOW" | "END" | "IGNORE" | "INCLUDE" | "INPUT" | "MOVE" | "OBTAIN"
            | "RESET" | "SET_KEY" | "STACK" | "SUBTRACT" => StatementKind::Instruction,

            "CALLNAT" | "PERFORM" => StatementKind::Call,

            "ESCAPE" | "REINPUT" => StatementKind::Jump(JumpScope::Internal),
            "FETCH" => StatementKind::Jump(JumpScope::External),

            "FOR" => StatementKind::ForLoop,
            "REPEAT" => StatementKind::ForeverLoop,
            "REPEAT_WHILE" | "DEFINE_SUBROUTINE" => {
                StatementKind::WhileLoop(WhileFlavor::Conditional)
            }
            "FIND_with_loop" | "READ" => StatementKind::WhileLoop(WhileFlavor::Database),

            "IF_open" | "IF_closed" => StatementKind::Alternative,
            "THEN_open" | "THEN_closed" => StatementKind::TrueBranch,
            "ELSE_open" | "ELSE_closed" => StatementKind::FalseBranch,

            "DECIDE_ON" => StatementKind::CaseHeader(CaseSelector::Value),
            "DECIDE_FOR" => StatementKind::CaseHeader(CaseSelector::Condition),
            "DECIDE_ON_branch" | "DECIDE_FOR_branch" => StatementKind::CaseBranch,
            "DECIDE_ON_none" | "DECIDE_FOR_none" => StatementKind::NoneBranch,
            "DECIDE_ON_condition" => StatementKind::ConditionAggregator,

            "GET" | "STORE" | "UPDATE" => StatementKind::DatabaseStatement,
            "assignment_all" => StatementKind::AssignmentLine,

            "REDEFINE" | "^" => StatementKind::NullStatement,

            _ => {
                debug!(production; "No diagram variant for production, passing through");
                StatementKind::Statement
            }
        }
    }

    /// Variant for terminal nodes.
    pub fn terminal(&self) -> StatementKind {
        StatementKind::Terminal
    }

    /// Variant for any grammar node.
    pub fn statement_for(&self, node: &GrammarNode) -> StatementKind {
        match node.lvalue() {
            Some(production) => self.lookup(production),
            None => self.terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_production_in_table() {
        let factory = StatementFactory::new();

        let table = [
            ("program", StatementKind::Document),
            ("ADD", StatementKind::Instruction),
            ("ASSIGN", StatementKind::Instruction),
            ("anon_ASSIGN", StatementKind::Instruction),
            ("COMPRESS", StatementKind::Instruction),
            ("COMPUTE", StatementKind::Instruction),
            ("DEFINE_DATA", StatementKind::Instruction),
            ("DEFINE_WINDOW", StatementKind::Instruction),
            ("END", StatementKind::Instruction),
            ("IGNORE", StatementKind::Instruction),
            ("INCLUDE", StatementKind::Instruction),
            ("INPUT", StatementKind::Instruction),
            ("MOVE", StatementKind::Instruction),
            ("OBTAIN", StatementKind::Instruction),
            ("RESET", StatementKind::Instruction),
            ("SET_KEY", StatementKind::Instruction),
            ("STACK", StatementKind::Instruction),
            ("SUBTRACT", StatementKind::Instruction),
            ("CALLNAT", StatementKind::Call),
            ("PERFORM", StatementKind::Call),
            ("ESCAPE", StatementKind::Jump(JumpScope::Internal)),
            ("REINPUT", StatementKind::Jump(JumpScope::Internal)),
            ("FETCH", StatementKind::Jump(JumpScope::External)),
            ("FOR", StatementKind::ForLoop),
            ("REPEAT", StatementKind::ForeverLoop),
            ("REPEAT_WHILE", StatementKind::WhileLoop(WhileFlavor::Conditional)),
            ("DEFINE_SUBROUTINE", StatementKind::WhileLoop(WhileFlavor::Conditional)),
            ("FIND_with_loop", StatementKind::WhileLoop(WhileFlavor::Database)),
            ("READ", StatementKind::WhileLoop(WhileFlavor::Database)),
            ("IF_open", StatementKind::Alternative),
            ("IF_closed", StatementKind::Alternative),
            ("THEN_open", StatementKind::TrueBranch),
            ("THEN_closed", StatementKind::TrueBranch),
            ("ELSE_open", StatementKind::FalseBranch),
            ("ELSE_closed", StatementKind::FalseBranch),
            ("DECIDE_ON", StatementKind::CaseHeader(CaseSelector::Value)),
            ("DECIDE_FOR", StatementKind::CaseHeader(CaseSelector::Condition)),
            ("DECIDE_ON_branch", StatementKind::CaseBranch),
            ("DECIDE_FOR_branch", StatementKind::CaseBranch),
            ("DECIDE_ON_none", StatementKind::NoneBranch),
            ("DECIDE_FOR_none", StatementKind::NoneBranch),
            ("DECIDE_ON_condition", StatementKind::ConditionAggregator),
            ("GET", StatementKind::DatabaseStatement),
            ("STORE", StatementKind::DatabaseStatement),
            ("UPDATE", StatementKind::DatabaseStatement),
            ("assignment_all", StatementKind::AssignmentLine),
            ("REDEFINE", StatementKind::NullStatement),
            ("^", StatementKind::NullStatement),
        ];

        for (production, kind) in table {
            assert_eq!(
                factory.lookup(production),
                kind,
                "production `{production}`"
            );
        }
    }

    #[test]
    fn test_open_and_closed_forms_share_a_variant() {
        let factory = StatementFactory::new();

        assert_eq!(factory.lookup("IF_open"), factory.lookup("IF_closed"));
        assert_eq!(factory.lookup("THEN_open"), StatementKind::TrueBranch);
        assert_eq!(factory.lookup("ELSE_closed"), StatementKind::FalseBranch);
    }

    #[test]
    fn test_jump_scope() {
        let factory = StatementFactory::new();

        assert_eq!(
            factory.lookup("ESCAPE"),
            StatementKind::Jump(JumpScope::Internal)
        );
        assert_eq!(
            factory.lookup("FETCH"),
            StatementKind::Jump(JumpScope::External)
        );
    }

    #[test]
    fn test_loops() {
        let factory = StatementFactory::new();

        assert_eq!(factory.lookup("FOR"), StatementKind::ForLoop);
        assert_eq!(factory.lookup("REPEAT"), StatementKind::ForeverLoop);
        assert_eq!(
            factory.lookup("DEFINE_SUBROUTINE"),
            StatementKind::WhileLoop(WhileFlavor::Conditional)
        );
        assert_eq!(
            factory.lookup("READ"),
            StatementKind::WhileLoop(WhileFlavor::Database)
        );
    }

    #[test]
    fn test_decide() {
        let factory = StatementFactory::new();

        assert_eq!(
            factory.lookup("DECIDE_FOR"),
            StatementKind::CaseHeader(CaseSelector::Condition)
        );
        assert_eq!(factory.lookup("DECIDE_FOR_branch"), StatementKind::CaseBranch);
        assert_eq!(factory.lookup("DECIDE_ON_none"), StatementKind::NoneBranch);
        assert_eq!(
            factory.lookup("DECIDE_ON_condition"),
            StatementKind::ConditionAggregator
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let factory = StatementFactory::new();

        assert_eq!(factory.lookup("move"), StatementKind::Statement);
        assert_eq!(factory.lookup("Program"), StatementKind::Statement);
    }

    #[test]
    fn test_statement_for_terminal() {
        let factory = StatementFactory::new();

        assert_eq!(
            factory.statement_for(&GrammarNode::terminal(1, "MOVE")),
            StatementKind::Terminal
        );
        assert_eq!(
            factory.statement_for(&GrammarNode::expression(1, "<^>")),
            StatementKind::NullStatement
        );
    }
}
