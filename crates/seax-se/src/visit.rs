//! Visitor framework over the expression algebra.
//!
//! Passes dispatch on the concrete variant through a closed match. Two
//! flavors exist:
//!
//! * [`SeVisitor`] maps an expression into an arbitrary output. Every case
//!   defaults to an "unsupported" failure, so a pass only implements the
//!   variants it understands and everything else is rejected with a
//!   `NotImplemented` error (the SMT lowering works this way).
//! * [`SeRewrite`] maps expressions to expressions. Every case defaults to
//!   a structural rebuild, so a pass overrides only the variants it
//!   changes (the conditionalizer works this way).

use crate::error::{EngineError, EngineResult};
use crate::expr::{BinaryExpr, Conditional, Expr, Literal, UnaryExpr, ValueOption, Variable};

/// Fallible traversal producing an arbitrary output per node.
pub trait SeVisitor {
    type Output;

    /// Dispatches on the concrete variant.
    fn visit(&mut self, expr: &Expr) -> EngineResult<Self::Output> {
        match expr {
            Expr::Variable(v) => self.visit_variable(v),
            Expr::Literal(l) => self.visit_literal(l),
            Expr::Unary(u) => self.visit_unary(u),
            Expr::Binary(b) => self.visit_binary(b),
            Expr::Conditional(c) => self.visit_conditional(c),
        }
    }

    fn visit_variable(&mut self, _variable: &Variable) -> EngineResult<Self::Output> {
        Err(EngineError::not_implemented("variable"))
    }

    fn visit_literal(&mut self, _literal: &Literal) -> EngineResult<Self::Output> {
        Err(EngineError::not_implemented("literal"))
    }

    fn visit_unary(&mut self, _unary: &UnaryExpr) -> EngineResult<Self::Output> {
        Err(EngineError::not_implemented("unary operator"))
    }

    fn visit_binary(&mut self, _binary: &BinaryExpr) -> EngineResult<Self::Output> {
        Err(EngineError::not_implemented("binary operator"))
    }

    fn visit_conditional(&mut self, _conditional: &Conditional) -> EngineResult<Self::Output> {
        Err(EngineError::not_implemented("conditional"))
    }
}

/// Expression-to-expression traversal defaulting to a structural rebuild.
pub trait SeRewrite {
    /// Dispatches on the concrete variant.
    fn rewrite(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Variable(v) => self.rewrite_variable(v),
            Expr::Literal(l) => self.rewrite_literal(l),
            Expr::Unary(u) => self.rewrite_unary(u),
            Expr::Binary(b) => self.rewrite_binary(b),
            Expr::Conditional(c) => self.rewrite_conditional(c),
        }
    }

    fn rewrite_variable(&mut self, variable: &Variable) -> Expr {
        Expr::Variable(variable.clone())
    }

    fn rewrite_literal(&mut self, literal: &Literal) -> Expr {
        Expr::Literal(literal.clone())
    }

    fn rewrite_unary(&mut self, unary: &UnaryExpr) -> Expr {
        Expr::Unary(UnaryExpr::new(unary.op, self.rewrite(&unary.arg)))
    }

    fn rewrite_binary(&mut self, binary: &BinaryExpr) -> Expr {
        Expr::Binary(BinaryExpr::new(
            self.rewrite(&binary.lhs),
            self.rewrite(&binary.rhs),
            binary.op,
        ))
    }

    fn rewrite_conditional(&mut self, conditional: &Conditional) -> Expr {
        let options = conditional
            .options
            .iter()
            .map(|option| ValueOption::new(option.condition.clone(), self.rewrite(&option.value)))
            .collect();
        Expr::Conditional(Conditional::new(conditional.se_type, options))
    }
}
