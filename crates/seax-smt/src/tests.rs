//! Unit and property tests for the SMT bridge.

use std::sync::OnceLock;

use proptest::prelude::*;

use seax_se::{
    se_and, se_false, se_not, se_or, se_true, BinOpKind, BinaryExpr, Conditional, EngineError,
    Expr, Literal, LiteralValue, SeType, ValueOption, Variable,
};
use seax_util::ContextId;

use crate::solver::check_sat;
use crate::term::Term;
use crate::{is_sat, se_simplify, se_to_smt, smt_to_se};

fn test_ctx() -> ContextId {
    static CTX: OnceLock<ContextId> = OnceLock::new();
    *CTX.get_or_init(ContextId::fresh)
}

fn int_var(name: &str) -> Expr {
    Expr::Variable(Variable::new(test_ctx(), name, SeType::Int))
}

fn bool_var(name: &str) -> Expr {
    Expr::Variable(Variable::new(test_ctx(), name, SeType::Bool))
}

fn int_lit(v: i64) -> Expr {
    Expr::Literal(Literal::new(LiteralValue::Int(v), SeType::Int).unwrap())
}

fn binary(lhs: Expr, rhs: Expr, op: BinOpKind) -> Expr {
    Expr::Binary(BinaryExpr::new(lhs, rhs, op))
}

#[test]
fn simplify_folds_arithmetic() {
    let sum = binary(int_lit(2), int_lit(3), BinOpKind::Add);
    assert_eq!(se_simplify(&sum).unwrap().to_string(), "5");

    let nested = binary(
        binary(int_lit(2), int_lit(3), BinOpKind::Mul),
        int_lit(1),
        BinOpKind::Sub,
    );
    assert_eq!(se_simplify(&nested).unwrap().to_string(), "5");
}

#[test]
fn simplify_folds_comparisons() {
    let dead = binary(int_lit(1), int_lit(2), BinOpKind::Eq);
    assert_eq!(se_simplify(&dead).unwrap().to_string(), "false");

    let live = binary(int_lit(1), int_lit(2), BinOpKind::Le);
    assert_eq!(se_simplify(&live).unwrap().to_string(), "true");
}

#[test]
fn simplify_drops_boolean_units() {
    let guard = binary(int_var("x"), int_lit(0), BinOpKind::Gt);
    let padded = se_and(se_true(), guard.clone());
    assert_eq!(se_simplify(&padded).unwrap().to_string(), "(x > 0)");

    let negated = se_not(se_and(se_true(), se_not(se_and(se_true(), guard))));
    assert_eq!(se_simplify(&negated).unwrap().to_string(), "(x > 0)");
}

#[test]
fn simplify_cancels_double_negation() {
    let p = bool_var("p");
    assert_eq!(se_simplify(&se_not(se_not(p))).unwrap().to_string(), "p");
}

#[test]
fn simplify_detects_complements() {
    let guard = binary(int_var("x"), int_lit(0), BinOpKind::Gt);
    let contradiction = se_and(guard.clone(), se_not(guard.clone()));
    assert_eq!(se_simplify(&contradiction).unwrap().to_string(), "false");

    let tautology = se_or(guard.clone(), se_not(guard));
    assert_eq!(se_simplify(&tautology).unwrap().to_string(), "true");
}

#[test]
fn simplify_keeps_connective_operand_order() {
    let a = bool_var("a");
    let b = bool_var("b");
    assert_eq!(
        se_simplify(&se_and(a, b)).unwrap().to_string(),
        "(a && b)"
    );
}

#[test]
fn check_sat_decides_propositional_structure() {
    let p = Term::Const {
        name: "p".to_string(),
        sort: crate::Sort::Bool,
    };
    let contradiction = Term::And(vec![p.clone(), Term::Not(Box::new(p.clone()))]);
    assert!(!check_sat(&contradiction));

    let open = Term::Or(vec![p.clone(), Term::Not(Box::new(p))]);
    assert!(check_sat(&open));
}

#[test]
fn is_sat_prunes_ground_falsehoods() {
    assert!(!is_sat(&binary(int_lit(1), int_lit(2), BinOpKind::Eq)).unwrap());
    assert!(is_sat(&binary(int_var("x"), int_lit(0), BinOpKind::Gt)).unwrap());

    let guard = binary(int_var("x"), int_lit(0), BinOpKind::Gt);
    assert!(!is_sat(&se_and(guard.clone(), se_not(guard))).unwrap());
    assert!(!is_sat(&se_false()).unwrap());
}

#[test]
fn lowering_records_symbols() {
    let guard = binary(int_var("x"), int_lit(0), BinOpKind::Gt);
    let (term, symbols) = se_to_smt(&guard).unwrap();
    assert_eq!(term.to_string(), "(> x 0)");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols["x"].se_type, SeType::Int);
}

#[test]
fn lowering_rejects_conditionals() {
    let cond = Expr::Conditional(Conditional::new(
        SeType::Int,
        vec![ValueOption::new(se_true(), int_lit(1))],
    ));
    assert!(matches!(
        se_to_smt(&cond),
        Err(EngineError::NotImplemented(_))
    ));
}

#[test]
fn lowering_rejects_unsupported_sorts() {
    let c = Expr::Variable(Variable::new(test_ctx(), "c", SeType::Char));
    assert!(matches!(se_to_smt(&c), Err(EngineError::NotImplemented(_))));
}

#[test]
fn raising_unknown_symbol_is_an_invariant_violation() {
    let term = Term::Const {
        name: "ghost".to_string(),
        sort: crate::Sort::Int,
    };
    let err = smt_to_se(&term, &Default::default()).unwrap_err();
    assert!(matches!(err, EngineError::Invariant(_)));
}

#[test]
fn integral_reals_collapse_to_int_literals() {
    let term = Term::RealConst(2.0);
    let back = smt_to_se(&term, &Default::default()).unwrap();
    assert_eq!(back.to_string(), "2");

    let term = Term::RealConst(2.5);
    let back = smt_to_se(&term, &Default::default()).unwrap();
    assert_eq!(back.to_string(), "2.5");
}

fn arb_int_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-100i64..100).prop_map(int_lit),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(int_var),
    ];
    leaf.prop_recursive(3, 24, 2, |inner| {
        (
            inner.clone(),
            inner,
            prop::sample::select(vec![
                BinOpKind::Add,
                BinOpKind::Sub,
                BinOpKind::Mul,
                BinOpKind::Div,
            ]),
        )
            .prop_map(|(lhs, rhs, op)| binary(lhs, rhs, op))
    })
}

fn arb_bool_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(|b| if b { se_true() } else { se_false() }),
        prop::sample::select(vec!["p", "q"]).prop_map(bool_var),
        (
            arb_int_expr(),
            arb_int_expr(),
            prop::sample::select(vec![
                BinOpKind::Eq,
                BinOpKind::Ne,
                BinOpKind::Gt,
                BinOpKind::Ge,
                BinOpKind::Lt,
                BinOpKind::Le,
            ])
        )
            .prop_map(|(lhs, rhs, op)| binary(lhs, rhs, op)),
    ];
    leaf.prop_recursive(3, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(se_not),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| se_and(a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| se_or(a, b)),
        ]
    })
}

proptest! {
    // Lowering and raising are mutually inverse on the Conditional-free
    // Int/Bool fragment.
    #[test]
    fn round_trip_is_structural_identity(expr in prop_oneof![arb_int_expr(), arb_bool_expr()]) {
        let (term, symbols) = se_to_smt(&expr).unwrap();
        let back = smt_to_se(&term, &symbols).unwrap();
        prop_assert_eq!(back, expr);
    }
}
