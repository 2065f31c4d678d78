//! The symbolic execution engine.
//!
//! A stateful facade over the context stack. The driver walks an AST and
//! calls the engine's primitives in source evaluation order; every value
//! read is conditionalized so later expressions carry the full history of
//! conditional writes. The `try_enter_*` family returns `false` without
//! pushing when the candidate context is unreachable or, for branches,
//! when its path condition is unsatisfiable.

use rustc_hash::FxHashMap;
use tracing::debug;

use seax_se::{
    se_not, BinOpKind, BinaryExpr, EngineError, EngineResult, Expr, Literal, LiteralValue, SeType,
    UnOpKind, UnaryExpr, Variable,
};

use crate::context::{BranchSide, Context, ContextKind};
use crate::optionalize;

/// Signature of a function as the engine needs it: name, return type and
/// ordered parameters. The driver keeps the body and the call graph.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub name: String,
    pub return_type: SeType,
    pub params: Vec<(String, SeType)>,
}

impl std::fmt::Display for FnSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|(_, t)| t.name()).collect();
        write!(f, "{} {}({})", self.return_type, self.name, params.join(", "))
    }
}

/// The symbolic execution engine.
pub struct Engine {
    /// Unrolling bound for loops and recursion.
    deepness: u32,
    /// Context stack; the global scope sits at the bottom and is never
    /// popped.
    stack: Vec<Context>,
    /// Live activations per function name, for the recursion bound.
    active_calls: FxHashMap<String, u32>,
}

impl Engine {
    pub fn new(deepness: u32) -> Self {
        Engine {
            deepness,
            stack: vec![Context::global()],
            active_calls: FxHashMap::default(),
        }
    }

    /// The unrolling bound this engine was created with.
    pub fn deepness(&self) -> u32 {
        self.deepness
    }

    fn current(&self) -> &Context {
        self.stack.last().expect("context stack is never empty")
    }

    fn current_mut(&mut self) -> &mut Context {
        self.stack.last_mut().expect("context stack is never empty")
    }

    /// Whether the current program point is reachable. The driver checks
    /// this before visiting each sibling statement.
    pub fn is_reachable(&self) -> bool {
        self.current().data.is_reachable
    }

    /// The current path condition.
    pub fn condition(&self) -> &Expr {
        &self.current().data.condition
    }

    /// Conditionalizes `expr` against the current context.
    pub fn conditionalize(&self, expr: &Expr) -> Expr {
        self.current().data.conditionalize(expr)
    }

    /// Creates a variable in the current context.
    pub fn create_variable(&mut self, name: &str, se_type: SeType) -> Variable {
        self.current_mut().data.create_variable(name, se_type)
    }

    /// Resolves a variable by name in the current context.
    pub fn get_variable_ref(&self, name: &str) -> EngineResult<Variable> {
        self.current().data.get_variable_ref(name)
    }

    /// Builds a literal of the given type.
    pub fn create_literal(&self, value: LiteralValue, se_type: SeType) -> EngineResult<Expr> {
        Ok(Literal::new(value, se_type)?.into())
    }

    /// Builds the implicit default literal of the given type.
    pub fn create_default_literal(&self, se_type: SeType) -> EngineResult<Expr> {
        Ok(Literal::implicit_default(se_type)?.into())
    }

    /// `assignee = value`: conditionalizes the value and records it for
    /// the assignee under the current path condition. Returns the
    /// conditionalized value (the value of the assignment expression).
    pub fn process_assignment(&mut self, assignee: &Variable, value: Expr) -> EngineResult<Expr> {
        let value = self.conditionalize(&value);
        self.current_mut()
            .data
            .update_variable(assignee, value.clone())?;
        Ok(value)
    }

    /// `return value`: assigns the enclosing function's returned variable
    /// and truncates the path, so any further statement in this scope runs
    /// under an unsatisfiable condition and the scope reads unreachable.
    pub fn process_return(&mut self, value: Expr) -> EngineResult<()> {
        let value = self.conditionalize(&value);
        let returned = self.enclosing_returned_variable()?;
        self.current_mut().data.update_variable(&returned, value)?;
        self.truncate_path();
        Ok(())
    }

    /// Bare `return;`: truncates the path without touching the returned
    /// variable.
    pub fn process_return_void(&mut self) -> EngineResult<()> {
        self.enclosing_returned_variable()?;
        self.truncate_path();
        Ok(())
    }

    /// Builds a binary operation over conditionalized operands. No eager
    /// evaluation happens here.
    pub fn process_binary_op(&mut self, lhs: Expr, rhs: Expr, op: BinOpKind) -> Expr {
        let lhs = self.conditionalize(&lhs);
        let rhs = self.conditionalize(&rhs);
        Expr::Binary(BinaryExpr::new(lhs, rhs, op))
    }

    /// Builds a unary operation over a conditionalized operand.
    pub fn process_unary_op(&mut self, arg: Expr, op: UnOpKind) -> Expr {
        let arg = self.conditionalize(&arg);
        Expr::Unary(UnaryExpr::new(op, arg))
    }

    /// Enters `sig` with the given call arguments (conditionalized in the
    /// caller's context). Refuses when the caller is unreachable or the
    /// function already has `deepness` live activations.
    pub fn try_enter_function(&mut self, sig: &FnSig, args: Vec<Expr>) -> EngineResult<bool> {
        if !self.is_reachable() {
            return Ok(false);
        }
        let live = self.active_calls.get(&sig.name).copied().unwrap_or(0);
        if live >= self.deepness {
            debug!(
                "refusing to re-enter `{}`: {live} live activation(s) at bound {}",
                sig.name, self.deepness
            );
            return Ok(false);
        }

        let args = args
            .into_iter()
            .map(|arg| self.conditionalize(&arg))
            .collect();
        let context = Context::function(&self.current().data, sig, args)?;
        self.active_calls.insert(sig.name.clone(), live + 1);
        self.stack.push(context);
        Ok(true)
    }

    /// Leaves the current function context, returning its conditionalized
    /// returned variable.
    pub fn leave_function(&mut self) -> EngineResult<Expr> {
        self.expect_kind("function", |kind| {
            matches!(kind, ContextKind::Function { .. })
        })?;
        let frame = self.pop();
        let returned = match &frame.kind {
            ContextKind::Function { name, returned } => {
                if let Some(live) = self.active_calls.get_mut(name) {
                    *live = live.saturating_sub(1);
                }
                returned.clone()
            }
            _ => unreachable!("kind checked above"),
        };
        let result = frame.data.conditionalize(&Expr::Variable(returned));
        frame.data.merge_into(&mut self.current_mut().data);
        Ok(result)
    }

    /// Enters a statement block scope.
    pub fn try_enter_block(&mut self) -> bool {
        if !self.is_reachable() {
            return false;
        }
        let context = Context::block(&self.current().data);
        self.stack.push(context);
        true
    }

    /// Leaves the current block scope, merging it into the outer scope.
    pub fn leave_block(&mut self) -> EngineResult<()> {
        self.expect_kind("block", |kind| matches!(kind, ContextKind::Block))?;
        let frame = self.pop();
        frame.data.merge_into(&mut self.current_mut().data);
        Ok(())
    }

    /// Enters a conditional statement scope for the given guard. The guard
    /// is conditionalized here; both branch contexts are built eagerly.
    pub fn try_enter_conditional(&mut self, guard: Expr) -> EngineResult<bool> {
        if !self.is_reachable() {
            return Ok(false);
        }
        let guard = self.conditionalize(&guard);
        let context = Context::conditional(&self.current().data, guard);
        self.stack.push(context);
        Ok(true)
    }

    /// Leaves the current conditional scope: merges the two branches into
    /// it, then merges it into the outer scope.
    pub fn leave_conditional(&mut self) -> EngineResult<()> {
        self.expect_kind("conditional", |kind| {
            matches!(kind, ContextKind::Conditional { .. })
        })?;
        let mut frame = self.pop();
        frame.merge_branches()?;
        frame.data.merge_into(&mut self.current_mut().data);
        Ok(())
    }

    /// Enters one arm of the current conditional. Refuses when the branch
    /// is unreachable or its path condition is unsatisfiable.
    pub fn try_enter_branch(&mut self, side: BranchSide) -> EngineResult<bool> {
        let branch = self.take_branch(side)?;

        let verdict = if branch.data.is_reachable {
            optionalize::feasible(&branch.data.condition)
        } else {
            Ok(false)
        };
        match verdict {
            Ok(true) => {
                self.stack.push(*branch);
                Ok(true)
            }
            Ok(false) => {
                debug!("skipping {side:?} branch: unreachable or unsatisfiable path condition");
                self.put_branch_back(side, branch)?;
                Ok(false)
            }
            Err(error) => {
                self.put_branch_back(side, branch)?;
                Err(error)
            }
        }
    }

    /// Leaves the current branch, handing it back to its conditional. The
    /// merge happens when the conditional itself is left.
    pub fn leave_branch(&mut self) -> EngineResult<()> {
        self.expect_kind("branch", |kind| matches!(kind, ContextKind::Branch { .. }))?;
        let frame = self.pop();
        let side = match frame.kind {
            ContextKind::Branch { side } => side,
            _ => unreachable!("kind checked above"),
        };
        self.put_branch_back(side, Box::new(frame))
    }

    fn take_branch(&mut self, side: BranchSide) -> EngineResult<Box<Context>> {
        let kind_name = self.current().kind_name();
        match &mut self.current_mut().kind {
            ContextKind::Conditional {
                true_branch,
                false_branch,
            } => {
                let slot = match side {
                    BranchSide::True => true_branch,
                    BranchSide::False => false_branch,
                };
                slot.take().ok_or_else(|| {
                    EngineError::invariant(format!("{side:?} branch already taken"))
                })
            }
            _ => Err(EngineError::invariant(format!(
                "inconsistent context: expected `conditional`, found `{kind_name}`"
            ))),
        }
    }

    fn put_branch_back(&mut self, side: BranchSide, branch: Box<Context>) -> EngineResult<()> {
        match &mut self.current_mut().kind {
            ContextKind::Conditional {
                true_branch,
                false_branch,
            } => {
                let slot = match side {
                    BranchSide::True => true_branch,
                    BranchSide::False => false_branch,
                };
                if slot.is_some() {
                    return Err(EngineError::invariant(format!(
                        "{side:?} branch slot already occupied"
                    )));
                }
                *slot = Some(branch);
                Ok(())
            }
            _ => Err(EngineError::invariant(
                "branch context not directly inside a conditional",
            )),
        }
    }

    /// Narrows the path condition from the current context outward,
    /// stopping at the function boundary: constraints added inside a
    /// callee must not leak into its caller, and the global scope is
    /// unconditioned.
    fn adjunct_condition(&mut self, extra: Expr) {
        for frame in self.stack.iter_mut().rev() {
            match frame.kind {
                ContextKind::Global => break,
                ContextKind::Function { .. } => {
                    frame.data.adjunct_condition_local(extra.clone());
                    break;
                }
                _ => frame.data.adjunct_condition_local(extra.clone()),
            }
        }
    }

    fn truncate_path(&mut self) {
        let negated = se_not(self.current().data.condition.clone());
        self.adjunct_condition(negated);
        self.current_mut().data.is_reachable = false;
    }

    fn enclosing_returned_variable(&self) -> EngineResult<Variable> {
        for frame in self.stack.iter().rev() {
            if let ContextKind::Function { returned, .. } = &frame.kind {
                return Ok(returned.clone());
            }
        }
        Err(EngineError::invariant("return outside a function"))
    }

    fn expect_kind(
        &self,
        expected: &str,
        matches: impl Fn(&ContextKind) -> bool,
    ) -> EngineResult<()> {
        if matches(&self.current().kind) {
            Ok(())
        } else {
            Err(EngineError::invariant(format!(
                "inconsistent context: expected `{expected}`, found `{}`",
                self.current().kind_name()
            )))
        }
    }

    fn pop(&mut self) -> Context {
        self.stack.pop().expect("context stack is never empty")
    }
}
