//! Term to symbolic expression conversion.

use rustc_hash::FxHashMap;

use seax_se::{
    binop_from_args, se_false, se_not, se_true, BinOpKind, BinaryExpr, EngineError, EngineResult,
    Expr, Literal, LiteralValue, SeType, Variable,
};

use crate::term::Term;

/// Raises a term back into a symbolic expression.
///
/// Variables are rehydrated from `symbols`, the table recorded while
/// lowering; an unknown symbol is an invariant violation. N-ary terms are
/// left-folded into binary expressions. A real constant with an integral
/// value collapses to an `int` literal.
pub fn smt_to_se(term: &Term, symbols: &FxHashMap<String, Variable>) -> EngineResult<Expr> {
    match term {
        Term::BoolConst(true) => Ok(se_true()),
        Term::BoolConst(false) => Ok(se_false()),
        Term::IntConst(v) => Ok(Literal::new(LiteralValue::Int(*v), SeType::Int)?.into()),
        Term::RealConst(v) => {
            if v.fract() == 0.0 {
                Ok(Literal::new(LiteralValue::Int(*v as i64), SeType::Int)?.into())
            } else {
                Ok(Literal::new(LiteralValue::Float(*v), SeType::Float)?.into())
            }
        }
        Term::Const { name, .. } => symbols
            .get(name)
            .map(|variable| Expr::Variable(variable.clone()))
            .ok_or_else(|| EngineError::invariant(format!("symbol `{name}` not found"))),
        Term::Not(t) => Ok(se_not(smt_to_se(t, symbols)?)),
        Term::And(ts) => raise_nary(BinOpKind::And, ts, symbols),
        Term::Or(ts) => raise_nary(BinOpKind::Or, ts, symbols),
        Term::Add(ts) => raise_nary(BinOpKind::Add, ts, symbols),
        Term::Mul(ts) => raise_nary(BinOpKind::Mul, ts, symbols),
        Term::Sub(a, b) => raise_binary(BinOpKind::Sub, a, b, symbols),
        Term::Div(a, b) => raise_binary(BinOpKind::Div, a, b, symbols),
        Term::Eq(a, b) => raise_binary(BinOpKind::Eq, a, b, symbols),
        Term::Ne(a, b) => raise_binary(BinOpKind::Ne, a, b, symbols),
        Term::Gt(a, b) => raise_binary(BinOpKind::Gt, a, b, symbols),
        Term::Ge(a, b) => raise_binary(BinOpKind::Ge, a, b, symbols),
        Term::Lt(a, b) => raise_binary(BinOpKind::Lt, a, b, symbols),
        Term::Le(a, b) => raise_binary(BinOpKind::Le, a, b, symbols),
    }
}

fn raise_nary(
    op: BinOpKind,
    args: &[Term],
    symbols: &FxHashMap<String, Variable>,
) -> EngineResult<Expr> {
    let converted = args
        .iter()
        .map(|arg| smt_to_se(arg, symbols))
        .collect::<EngineResult<Vec<_>>>()?;
    binop_from_args(op, converted)
        .ok_or_else(|| EngineError::invariant(format!("empty `{}` application", op.sign())))
}

fn raise_binary(
    op: BinOpKind,
    lhs: &Term,
    rhs: &Term,
    symbols: &FxHashMap<String, Variable>,
) -> EngineResult<Expr> {
    Ok(Expr::Binary(BinaryExpr::new(
        smt_to_se(lhs, symbols)?,
        smt_to_se(rhs, symbols)?,
        op,
    )))
}
