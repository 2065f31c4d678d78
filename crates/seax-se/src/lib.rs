//! seax-se - Symbolic Expression Algebra
//!
//! The value language of the analyzer. A symbolic expression is a tree in
//! the algebra `{Variable, Literal, Unary, Binary, Conditional}` standing
//! for a value that has not been concretized. Expressions are pure data:
//! constructors never simplify, equality and hashing are structural, and
//! every transformation produces a new tree.
//!
//! The crate also hosts the visitor framework shared by the passes built on
//! top of the algebra (conditionalizer, optionalizer, SMT lowering) and the
//! conditionalizer itself, which inlines a variable's recorded conditional
//! values at every read site.

pub mod cond;
pub mod error;
pub mod expr;
pub mod ty;
pub mod visit;

#[cfg(test)]
mod tests;

pub use cond::{conditionalize, Conditionalizer};
pub use error::{EngineError, EngineResult};
pub use expr::{
    binop_from_args, se_and, se_false, se_not, se_or, se_true, BinOpKind, BinaryExpr, Conditional,
    Expr, Literal, LiteralValue, UnOpKind, UnaryExpr, ValueOption, Variable,
};
pub use ty::SeType;
pub use visit::{SeRewrite, SeVisitor};

/// Ordered map from variable to its known conditional values.
///
/// Insertion order is observable in reports, hence an `IndexMap`.
pub type OptionMap = indexmap::IndexMap<Variable, Vec<ValueOption>>;
