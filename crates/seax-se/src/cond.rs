//! Conditionalization: inlining a variable's recorded values at read sites.

use crate::expr::{Conditional, Expr, Variable};
use crate::visit::SeRewrite;
use crate::OptionMap;

/// Replaces every variable that currently has at least one recorded option
/// with a [`Conditional`] carrying a copy of that option list. Variables
/// without options are left untouched.
///
/// The options are copied so that later mutation of the context's option
/// map does not alter expressions already built.
pub struct Conditionalizer<'a> {
    options: &'a OptionMap,
}

impl<'a> Conditionalizer<'a> {
    pub fn new(options: &'a OptionMap) -> Self {
        Conditionalizer { options }
    }
}

impl SeRewrite for Conditionalizer<'_> {
    fn rewrite_variable(&mut self, variable: &Variable) -> Expr {
        match self.options.get(variable) {
            Some(options) if !options.is_empty() => {
                Expr::Conditional(Conditional::new(variable.se_type, options.clone()))
            }
            _ => Expr::Variable(variable.clone()),
        }
    }
}

/// Conditionalizes `expr` against `options`.
pub fn conditionalize(options: &OptionMap, expr: &Expr) -> Expr {
    Conditionalizer::new(options).rewrite(expr)
}
