//! Call analysis: function descriptors, callee sets and entry points.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

use seax_exec::FnSig;
use seax_par::{Expr, FunctionDef, Stmt, TranslationUnit, TypeName};
use seax_se::{EngineResult, SeType};

/// Resolves a declared type to its symbolic counterpart.
pub fn se_type_of(ty: &TypeName) -> EngineResult<SeType> {
    SeType::from_name(&ty.spelling())
}

/// Everything the driver knows about one function.
#[derive(Debug)]
pub struct FunctionDescriptor {
    pub sig: FnSig,
    pub body: Stmt,
    /// Names of the functions called anywhere in the body.
    pub callees: IndexSet<String>,
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.sig.fmt(f)
    }
}

/// Functions of a translation unit, in source order.
pub type FunctionMap = IndexMap<String, FunctionDescriptor>;

/// Builds the function map of a translation unit.
pub fn analyze_calls(unit: TranslationUnit) -> EngineResult<FunctionMap> {
    let mut functions = IndexMap::new();
    for function in unit.functions {
        let descriptor = describe(function)?;
        functions.insert(descriptor.sig.name.clone(), descriptor);
    }
    Ok(functions)
}

fn describe(function: FunctionDef) -> EngineResult<FunctionDescriptor> {
    let mut params = Vec::with_capacity(function.params.len());
    for param in &function.params {
        params.push((param.name.clone(), se_type_of(&param.ty)?));
    }
    let sig = FnSig {
        name: function.name,
        return_type: se_type_of(&function.return_type)?,
        params,
    };

    let mut callees = IndexSet::new();
    collect_calls_stmt(&function.body, &mut callees);

    Ok(FunctionDescriptor {
        sig,
        body: function.body,
        callees,
    })
}

fn collect_calls_stmt(stmt: &Stmt, out: &mut IndexSet<String>) {
    match stmt {
        Stmt::Compound(items) => {
            for item in items {
                collect_calls_stmt(item, out);
            }
        }
        Stmt::Decl { init, .. } => {
            if let Some(init) = init {
                collect_calls_expr(init, out);
            }
        }
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_calls_expr(cond, out);
            collect_calls_stmt(then_branch, out);
            if let Some(else_branch) = else_branch {
                collect_calls_stmt(else_branch, out);
            }
        }
        Stmt::While { cond, body } => {
            collect_calls_expr(cond, out);
            collect_calls_stmt(body, out);
        }
        Stmt::Return(Some(expr)) => collect_calls_expr(expr, out),
        Stmt::Return(None) | Stmt::Empty => {}
        Stmt::Expr(expr) => collect_calls_expr(expr, out),
    }
}

fn collect_calls_expr(expr: &Expr, out: &mut IndexSet<String>) {
    match expr {
        Expr::Call { name, args } => {
            out.insert(name.clone());
            for arg in args {
                collect_calls_expr(arg, out);
            }
        }
        Expr::Assign { value, .. } => collect_calls_expr(value, out),
        Expr::Unary { expr, .. } => collect_calls_expr(expr, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_calls_expr(lhs, out);
            collect_calls_expr(rhs, out);
        }
        Expr::IntLit(_)
        | Expr::FloatLit(_)
        | Expr::CharLit(_)
        | Expr::StrLit(_)
        | Expr::Ident(_) => {}
    }
}

/// A function is an entry point iff no function in the translation unit
/// names it as a callee.
pub fn entry_points(functions: &FunctionMap) -> Vec<String> {
    let called: FxHashSet<&String> = functions
        .values()
        .flat_map(|descriptor| descriptor.callees.iter())
        .collect();

    functions
        .keys()
        .filter(|name| !called.contains(name))
        .cloned()
        .collect()
}
