//! Symbolic expression to term conversion.

use rustc_hash::FxHashMap;

use seax_se::{
    BinOpKind, BinaryExpr, Conditional, EngineError, EngineResult, Expr, Literal, LiteralValue,
    SeType, SeVisitor, UnOpKind, UnaryExpr, Variable,
};

use crate::term::{Sort, Term};

/// Lowers a symbolic expression into a first-order term, recording every
/// variable encountered by name so the reverse conversion can rehydrate
/// the original `Variable` objects.
#[derive(Default)]
pub struct SeToSmt {
    pub symbols: FxHashMap<String, Variable>,
}

impl SeToSmt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeVisitor for SeToSmt {
    type Output = Term;

    fn visit_variable(&mut self, variable: &Variable) -> EngineResult<Term> {
        let sort = match variable.se_type {
            SeType::Bool => Sort::Bool,
            SeType::Int => Sort::Int,
            SeType::Float => Sort::Real,
            other => return Err(EngineError::not_implemented(other)),
        };
        self.symbols
            .insert(variable.name.clone(), variable.clone());
        Ok(Term::Const {
            name: variable.name.clone(),
            sort,
        })
    }

    fn visit_literal(&mut self, literal: &Literal) -> EngineResult<Term> {
        match (&literal.value, literal.se_type) {
            (LiteralValue::Bool(b), SeType::Bool) => Ok(Term::BoolConst(*b)),
            (LiteralValue::Int(v), SeType::Int) => Ok(Term::IntConst(*v)),
            (LiteralValue::Float(v), SeType::Float) => Ok(Term::RealConst(*v)),
            _ => Err(EngineError::not_implemented(literal.se_type)),
        }
    }

    fn visit_unary(&mut self, unary: &UnaryExpr) -> EngineResult<Term> {
        let arg = self.visit(&unary.arg)?;
        match unary.op {
            UnOpKind::Not => Ok(Term::Not(Box::new(arg))),
        }
    }

    fn visit_binary(&mut self, binary: &BinaryExpr) -> EngineResult<Term> {
        let lhs = self.visit(&binary.lhs)?;
        let rhs = self.visit(&binary.rhs)?;
        Ok(match binary.op {
            BinOpKind::And => Term::And(vec![lhs, rhs]),
            BinOpKind::Or => Term::Or(vec![lhs, rhs]),
            BinOpKind::Add => Term::Add(vec![lhs, rhs]),
            BinOpKind::Mul => Term::Mul(vec![lhs, rhs]),
            BinOpKind::Sub => Term::Sub(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Div => Term::Div(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Eq => Term::Eq(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Ne => Term::Ne(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Gt => Term::Gt(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Ge => Term::Ge(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Lt => Term::Lt(Box::new(lhs), Box::new(rhs)),
            BinOpKind::Le => Term::Le(Box::new(lhs), Box::new(rhs)),
        })
    }

    fn visit_conditional(&mut self, _conditional: &Conditional) -> EngineResult<Term> {
        Err(EngineError::not_implemented(
            "conditional value in SMT conversion",
        ))
    }
}

/// Lowers `expr`, returning the term and the recorded symbol table.
pub fn se_to_smt(expr: &Expr) -> EngineResult<(Term, FxHashMap<String, Variable>)> {
    let mut converter = SeToSmt::new();
    let term = converter.visit(expr)?;
    Ok((term, converter.symbols))
}
