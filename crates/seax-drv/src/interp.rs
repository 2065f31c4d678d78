//! The AST walker driving the symbolic engine.
//!
//! Statements and expressions are visited in source evaluation order; the
//! operands of a binary operator are evaluated right first, then left,
//! which is the order visible in the logs. Sibling statement visits are
//! guarded by the engine's reachability flag. AST shapes outside the
//! supported subset are reported as warnings and skipped; they never abort
//! the engine.

use tracing::{debug, info, warn};

use seax_exec::{optionalize, BranchSide, Engine};
use seax_par::{Expr as AstExpr, Stmt, UnOp};
use seax_se::{BinOpKind, EngineResult, Expr, LiteralValue, SeType, UnOpKind};

use crate::calls::{se_type_of, FunctionMap};

/// Walks function bodies, translating AST constructs into engine
/// primitives.
pub struct Interpreter<'a> {
    engine: Engine,
    functions: &'a FunctionMap,
}

impl<'a> Interpreter<'a> {
    pub fn new(engine: Engine, functions: &'a FunctionMap) -> Self {
        Interpreter { engine, functions }
    }

    /// Analyses a call to `name` with no arguments, as used for entry
    /// points. Returns the conditionalized return value, or `None` when
    /// the function is unknown or the engine refused to enter it.
    pub fn call_function(&mut self, name: &str) -> EngineResult<Option<Expr>> {
        self.call(name, Vec::new())
    }

    fn call(&mut self, name: &str, args: Vec<Expr>) -> EngineResult<Option<Expr>> {
        // Take the map reference out so the descriptor's borrow is not
        // tied to `self` across the body walk.
        let functions = self.functions;
        let Some(descriptor) = functions.get(name) else {
            // Unknown callees are ignored and yield no value.
            debug!("call to unknown function `{name}` ignored");
            return Ok(None);
        };

        if !self.engine.try_enter_function(&descriptor.sig, args)? {
            return Ok(None);
        }

        info!("entering body of function `{descriptor}`");
        self.exec(&descriptor.body)?;
        let result = self.engine.leave_function()?;
        info!("left body of function `{descriptor}`");

        let mut rendered = String::new();
        for option in optionalize(&result) {
            rendered.push_str(&format!("    {},\n", option?));
        }
        info!("`{descriptor}` returned: {{\n{rendered}}}");

        Ok(Some(result))
    }

    fn exec(&mut self, stmt: &Stmt) -> EngineResult<()> {
        match stmt {
            Stmt::Compound(items) => {
                if self.engine.try_enter_block() {
                    for item in items {
                        if self.engine.is_reachable() {
                            self.exec(item)?;
                        }
                    }
                    self.engine.leave_block()?;
                }
            }
            Stmt::Decl { ty, name, init } => {
                let se_type = se_type_of(ty)?;
                let variable = self.engine.create_variable(name, se_type);
                let value = match init {
                    Some(init) => match self.eval(init)? {
                        Some(value) => value,
                        None => {
                            warn!("unsupported initializer for `{name}`; using the default");
                            self.engine.create_default_literal(se_type)?
                        }
                    },
                    None => self.engine.create_default_literal(se_type)?,
                };
                let value = self.engine.process_assignment(&variable, value)?;
                debug!("variable `{se_type} {name}` initialized with `{value}`");
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let Some(guard) = self.eval(cond)? else {
                    warn!("unsupported condition expression; skipping `if`");
                    return Ok(());
                };
                if self.engine.try_enter_conditional(guard)? {
                    if self.engine.try_enter_branch(BranchSide::True)? {
                        self.exec(then_branch)?;
                        self.engine.leave_branch()?;
                    }
                    if let Some(else_branch) = else_branch {
                        if self.engine.try_enter_branch(BranchSide::False)? {
                            self.exec(else_branch)?;
                            self.engine.leave_branch()?;
                        }
                    }
                    self.engine.leave_conditional()?;
                }
            }
            Stmt::While { cond, body } => {
                let budget = self.engine.deepness();
                self.exec_while(cond, body, budget)?;
            }
            Stmt::Return(Some(expr)) => {
                let Some(value) = self.eval(expr)? else {
                    warn!("unsupported return expression; skipping `return`");
                    return Ok(());
                };
                self.engine.process_return(value)?;
            }
            Stmt::Return(None) => self.engine.process_return_void()?,
            Stmt::Expr(expr) => {
                self.eval(expr)?;
            }
            Stmt::Empty => {}
        }
        Ok(())
    }

    /// Unrolls `while (cond) body` as `budget` nested one-armed
    /// conditionals; iterations beyond the budget are dropped.
    fn exec_while(&mut self, cond: &AstExpr, body: &Stmt, budget: u32) -> EngineResult<()> {
        if budget == 0 {
            return Ok(());
        }
        let Some(guard) = self.eval(cond)? else {
            warn!("unsupported condition expression; skipping `while`");
            return Ok(());
        };
        if self.engine.try_enter_conditional(guard)? {
            if self.engine.try_enter_branch(BranchSide::True)? {
                self.exec(body)?;
                if self.engine.is_reachable() {
                    self.exec_while(cond, body, budget - 1)?;
                }
                self.engine.leave_branch()?;
            }
            self.engine.leave_conditional()?;
        }
        Ok(())
    }

    /// Evaluates an expression into a symbolic value. `None` means the
    /// expression (or one of its operands) is outside the supported
    /// subset; a warning has already been emitted.
    fn eval(&mut self, expr: &AstExpr) -> EngineResult<Option<Expr>> {
        match expr {
            AstExpr::IntLit(v) => self
                .engine
                .create_literal(LiteralValue::Int(*v), SeType::Int)
                .map(Some),
            AstExpr::FloatLit(v) => self
                .engine
                .create_literal(LiteralValue::Float(*v), SeType::Float)
                .map(Some),
            AstExpr::CharLit(c) => self
                .engine
                .create_literal(LiteralValue::Char(*c), SeType::Char)
                .map(Some),
            AstExpr::StrLit(s) => self
                .engine
                .create_literal(LiteralValue::Str(s.clone()), SeType::CharArray)
                .map(Some),
            AstExpr::Ident(name) => match name.as_str() {
                "true" => self
                    .engine
                    .create_literal(LiteralValue::Bool(true), SeType::Bool)
                    .map(Some),
                "false" => self
                    .engine
                    .create_literal(LiteralValue::Bool(false), SeType::Bool)
                    .map(Some),
                _ => Ok(Some(Expr::Variable(self.engine.get_variable_ref(name)?))),
            },
            AstExpr::Assign { name, value } => {
                let Some(rvalue) = self.eval(value)? else {
                    warn!("unsupported right-hand side; skipping assignment to `{name}`");
                    return Ok(None);
                };
                let variable = self.engine.get_variable_ref(name)?;
                Ok(Some(self.engine.process_assignment(&variable, rvalue)?))
            }
            AstExpr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let Some(value) = self.eval(arg)? else {
                        warn!("unsupported argument in call to `{name}`; skipping the call");
                        return Ok(None);
                    };
                    values.push(value);
                }
                self.call(name, values)
            }
            AstExpr::Unary { op: UnOp::Not, expr } => {
                let Some(value) = self.eval(expr)? else {
                    return Ok(None);
                };
                let op = UnOpKind::from_sign(UnOp::Not.sign())?;
                Ok(Some(self.engine.process_unary_op(value, op)))
            }
            AstExpr::Unary { op: UnOp::Neg, .. } => {
                warn!("unsupported AST node: unary `-` over a non-literal");
                Ok(None)
            }
            AstExpr::Binary { op, lhs, rhs } => {
                let rhs_value = self.eval(rhs)?;
                let lhs_value = self.eval(lhs)?;
                let (Some(lhs_value), Some(rhs_value)) = (lhs_value, rhs_value) else {
                    warn!("unsupported operand of `{}`; skipping", op.sign());
                    return Ok(None);
                };
                let op = BinOpKind::from_sign(op.sign())?;
                Ok(Some(self.engine.process_binary_op(lhs_value, rhs_value, op)))
            }
        }
    }
}
