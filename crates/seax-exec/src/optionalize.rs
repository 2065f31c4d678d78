//! Optionalization: flattening a symbolic tree into its feasible
//! `(condition, value)` alternatives.
//!
//! [`enumerate`] lazily unfolds every `Conditional` choice inside an
//! expression; laziness matters because the Cartesian product under a
//! binary operator can be large. [`optionalize`] then simplifies each
//! alternative through the solver and keeps only the satisfiable ones.
//! This is the single place the solver prunes infeasible paths from a
//! reported result.

use seax_se::{se_and, BinaryExpr, EngineResult, Expr, UnaryExpr, ValueOption};
use seax_smt::{is_sat, se_simplify};

/// Lazily enumerates the raw alternatives of `expr`.
///
/// Literals and variables are themselves; a unary operator maps over its
/// argument's alternatives; a binary operator takes the Cartesian product
/// of its operands' alternatives, conjoining their conditions; a
/// `Conditional` contributes each stored option narrowed by the
/// alternatives of its value.
pub fn enumerate(expr: Expr) -> Box<dyn Iterator<Item = ValueOption>> {
    match expr {
        Expr::Variable(_) | Expr::Literal(_) => {
            Box::new(std::iter::once(ValueOption::new(seax_se::se_true(), expr)))
        }
        Expr::Unary(unary) => {
            let op = unary.op;
            Box::new(enumerate(*unary.arg).map(move |option| {
                ValueOption::new(
                    option.condition,
                    Expr::Unary(UnaryExpr::new(op, option.value)),
                )
            }))
        }
        Expr::Binary(binary) => {
            let op = binary.op;
            let rhs = *binary.rhs;
            Box::new(enumerate(*binary.lhs).flat_map(move |lhs_option| {
                let lhs_condition = lhs_option.condition;
                let lhs_value = lhs_option.value;
                enumerate(rhs.clone()).map(move |rhs_option| {
                    ValueOption::new(
                        se_and(lhs_condition.clone(), rhs_option.condition),
                        Expr::Binary(BinaryExpr::new(lhs_value.clone(), rhs_option.value, op)),
                    )
                })
            }))
        }
        Expr::Conditional(conditional) => {
            Box::new(conditional.options.into_iter().flat_map(|option| {
                let condition = option.condition;
                enumerate(option.value).map(move |value_option| {
                    ValueOption::new(
                        se_and(condition.clone(), value_option.condition),
                        value_option.value,
                    )
                })
            }))
        }
    }
}

/// Lazily flattens a boolean expression into `Conditional`-free
/// formulas, one per combination of embedded conditional choices.
///
/// Path conditions embed `Conditional` nodes whenever a guard read a
/// variable with recorded options, and the SMT lowering rejects those;
/// each alternative's residual condition is conjoined with the guard under
/// which it applies. Stored option conditions can themselves embed
/// conditionals (nested guards), hence the recursion.
pub fn flatten_condition(condition: Expr) -> Box<dyn Iterator<Item = Expr>> {
    Box::new(enumerate(condition).flat_map(|option| -> Box<dyn Iterator<Item = Expr>> {
        if option.condition.has_conditional() {
            let value = option.value;
            Box::new(
                flatten_condition(option.condition)
                    .map(move |condition| se_and(condition, value.clone())),
            )
        } else {
            Box::new(std::iter::once(se_and(option.condition, option.value)))
        }
    }))
}

/// Enumerates the feasible alternatives of `expr`, each with its condition
/// and value simplified through the solver. An alternative whose condition
/// holds under several conditional sub-cases yields one option per
/// sub-case.
pub fn optionalize(expr: &Expr) -> impl Iterator<Item = EngineResult<ValueOption>> {
    enumerate(expr.clone())
        .flat_map(|option| {
            let value = option.value;
            flatten_condition(option.condition)
                .map(move |condition| ValueOption::new(condition, value.clone()))
        })
        .filter_map(|candidate| refine(candidate).transpose())
}

fn refine(candidate: ValueOption) -> EngineResult<Option<ValueOption>> {
    let condition = se_simplify(&candidate.condition)?;
    if !is_sat(&condition)? {
        return Ok(None);
    }
    let value = se_simplify(&candidate.value)?;
    Ok(Some(ValueOption::new(condition, value)))
}

/// Whether a path condition is satisfiable under at least one of its
/// flattened alternatives.
pub fn feasible(condition: &Expr) -> EngineResult<bool> {
    for flattened in flatten_condition(condition.clone()) {
        if is_sat(&flattened)? {
            return Ok(true);
        }
    }
    Ok(false)
}
