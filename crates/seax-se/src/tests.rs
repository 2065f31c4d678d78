//! Unit tests for the expression algebra and the conditionalizer.

use indexmap::IndexMap;
use seax_util::ContextId;

use crate::*;

fn int_var(ctx: ContextId, name: &str) -> Variable {
    Variable::new(ctx, name, SeType::Int)
}

fn int_lit(v: i64) -> Expr {
    Expr::Literal(Literal::new(LiteralValue::Int(v), SeType::Int).unwrap())
}

#[test]
fn variables_from_distinct_contexts_differ() {
    let a = int_var(ContextId::fresh(), "x");
    let b = int_var(ContextId::fresh(), "x");
    assert_ne!(a, b);

    let c = Variable::new(a.context_id, "x", SeType::Int);
    assert_eq!(a, c);
}

#[test]
fn variable_type_is_part_of_identity() {
    let ctx = ContextId::fresh();
    let a = Variable::new(ctx, "x", SeType::Int);
    let b = Variable::new(ctx, "x", SeType::Bool);
    assert_ne!(a, b);
}

#[test]
fn literal_equality_ignores_implicit_flag() {
    let explicit = Literal::new(LiteralValue::Int(0), SeType::Int).unwrap();
    let implicit = Literal::implicit_default(SeType::Int).unwrap();
    assert_eq!(explicit, implicit);
}

#[test]
fn literal_coercion() {
    let l = Literal::new(LiteralValue::Int(3), SeType::Float).unwrap();
    assert_eq!(l.value, LiteralValue::Float(3.0));

    let l = Literal::new(LiteralValue::Int(2), SeType::Bool).unwrap();
    assert_eq!(l.value, LiteralValue::Bool(true));

    let l = Literal::new(LiteralValue::Float(2.9), SeType::Int).unwrap();
    assert_eq!(l.value, LiteralValue::Int(2));
}

#[test]
fn void_literal_is_not_implemented() {
    let err = Literal::new(LiteralValue::Int(0), SeType::Void).unwrap_err();
    assert!(matches!(err, EngineError::NotImplemented(_)));
}

#[test]
fn binary_equality_compares_operands_only() {
    let ctx = ContextId::fresh();
    let a = Expr::Variable(int_var(ctx, "a"));
    let b = Expr::Variable(int_var(ctx, "b"));

    let sum = Expr::Binary(BinaryExpr::new(a.clone(), b.clone(), BinOpKind::Add));
    let diff = Expr::Binary(BinaryExpr::new(a.clone(), b.clone(), BinOpKind::Sub));
    let flipped = Expr::Binary(BinaryExpr::new(b, a, BinOpKind::Add));

    assert_eq!(sum, diff);
    assert_ne!(sum, flipped);
}

#[test]
fn options_compare_by_identity() {
    let first = ValueOption::new(se_true(), int_lit(1));
    let second = ValueOption::new(se_true(), int_lit(1));
    assert_ne!(first, second);
    assert_eq!(first, first.clone());
}

#[test]
fn conditional_equality_follows_option_identity() {
    let option = ValueOption::new(se_true(), int_lit(1));
    let a = Conditional::new(SeType::Int, vec![option.clone()]);
    let b = Conditional::new(SeType::Int, vec![option]);
    assert_eq!(a, b);

    let c = Conditional::new(SeType::Int, vec![ValueOption::new(se_true(), int_lit(1))]);
    assert_ne!(a, c);
}

#[test]
fn binary_type_mismatch_is_a_kind_error() {
    let ctx = ContextId::fresh();
    let i = Expr::Variable(Variable::new(ctx, "i", SeType::Int));
    let b = Expr::Variable(Variable::new(ctx, "b", SeType::Bool));
    let mixed = Expr::Binary(BinaryExpr::new(i, b, BinOpKind::Add));
    assert!(matches!(mixed.se_type(), Err(EngineError::Invariant(_))));
}

#[test]
fn binop_from_args_left_folds() {
    let ctx = ContextId::fresh();
    let a = Expr::Variable(int_var(ctx, "a"));
    let b = Expr::Variable(int_var(ctx, "b"));
    let c = Expr::Variable(int_var(ctx, "c"));

    let folded = binop_from_args(BinOpKind::Add, vec![a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(folded.to_string(), "((a + b) + c)");

    let single = binop_from_args(BinOpKind::Add, vec![a]).unwrap();
    assert_eq!(single.to_string(), "a");

    assert!(binop_from_args(BinOpKind::Add, Vec::new()).is_none());
}

#[test]
fn display_forms() {
    let ctx = ContextId::fresh();
    let x = Expr::Variable(int_var(ctx, "x"));
    assert_eq!(x.to_string(), "x");

    let c = Expr::Literal(Literal::new(LiteralValue::Char('a'), SeType::Char).unwrap());
    assert_eq!(c.to_string(), "'a'");

    let s = Expr::Literal(
        Literal::new(LiteralValue::Str("hi".to_string()), SeType::CharArray).unwrap(),
    );
    assert_eq!(s.to_string(), "\"hi\"");

    let not = se_not(x.clone());
    assert_eq!(not.to_string(), "(!x)");

    let cmp = Expr::Binary(BinaryExpr::new(x, int_lit(0), BinOpKind::Gt));
    assert_eq!(cmp.to_string(), "(x > 0)");

    let cond = Expr::Conditional(Conditional::new(
        SeType::Int,
        vec![
            ValueOption::new(cmp.clone(), int_lit(1)),
            ValueOption::new(se_not(cmp), int_lit(0)),
        ],
    ));
    assert_eq!(cond.to_string(), "{(x > 0) -> 1, (!(x > 0)) -> 0}");
}

#[test]
fn conditionalize_replaces_tracked_variables() {
    let ctx = ContextId::fresh();
    let x = int_var(ctx, "x");
    let y = int_var(ctx, "y");

    let mut options: OptionMap = IndexMap::new();
    options.insert(x.clone(), vec![ValueOption::new(se_true(), int_lit(4))]);
    options.insert(y.clone(), Vec::new());

    let read = Expr::Binary(BinaryExpr::new(
        Expr::Variable(x),
        Expr::Variable(y),
        BinOpKind::Add,
    ));
    let conditioned = conditionalize(&options, &read);
    assert_eq!(conditioned.to_string(), "({true -> 4} + y)");
}

#[test]
fn conditionalize_copies_options() {
    let ctx = ContextId::fresh();
    let x = int_var(ctx, "x");

    let mut options: OptionMap = IndexMap::new();
    options.insert(x.clone(), vec![ValueOption::new(se_true(), int_lit(4))]);

    let conditioned = conditionalize(&options, &Expr::Variable(x.clone()));

    // Narrowing the stored option after the read must not change the
    // expression already built.
    options.get_mut(&x).unwrap()[0].adjunct_condition(se_false());
    assert_eq!(conditioned.to_string(), "{true -> 4}");
}

#[test]
fn adjunct_condition_conjoins() {
    let ctx = ContextId::fresh();
    let g = Expr::Variable(Variable::new(ctx, "g", SeType::Bool));
    let mut option = ValueOption::new(se_true(), int_lit(1));
    option.adjunct_condition(se_not(g));
    assert_eq!(option.to_string(), "(true && (!g)) -> 1");
}
