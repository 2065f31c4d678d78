//! seax-smt - Bridge between symbolic expressions and first-order logic
//!
//! The engine reports and prunes paths through an SMT-style solver. This
//! crate owns both directions of the bridge and the solver itself:
//!
//! * [`term`] - a first-order term language over the `Bool`, `Int` and
//!   `Real` sorts, printed in SMT-LIB notation.
//! * [`lower`] - symbolic expression to term conversion. `Conditional`
//!   nodes are rejected; callers must optionalize first.
//! * [`raise`] - term to symbolic expression conversion, rehydrating
//!   variables from the symbol table recorded during lowering.
//! * [`solver`] - `simplify` (term rewriting) and `check_sat`
//!   (satisfiability of the propositional abstraction).
//!
//! The solver is treated as an opaque collaborator: one call in, one
//! result out, no state kept across calls.

pub mod lower;
pub mod raise;
pub mod solver;
pub mod term;

#[cfg(test)]
mod tests;

pub use lower::{se_to_smt, SeToSmt};
pub use raise::smt_to_se;
pub use term::{Sort, Term};

use seax_se::{EngineResult, Expr};

/// Simplifies a symbolic expression by a round trip through the solver.
pub fn se_simplify(expr: &Expr) -> EngineResult<Expr> {
    let (term, symbols) = se_to_smt(expr)?;
    let simplified = solver::simplify(&term);
    smt_to_se(&simplified, &symbols)
}

/// Whether a boolean symbolic expression is satisfiable.
pub fn is_sat(expr: &Expr) -> EngineResult<bool> {
    let (term, _) = se_to_smt(expr)?;
    Ok(solver::check_sat(&term))
}
