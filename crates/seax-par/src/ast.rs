//! AST for the C subset.

/// A parsed translation unit.
#[derive(Debug)]
pub struct TranslationUnit {
    pub functions: Vec<FunctionDef>,
    /// Top-level declarations that are not function definitions.
    pub globals: Vec<Stmt>,
}

/// A function definition.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: TypeName,
    pub params: Vec<Param>,
    pub body: Stmt,
}

/// A function parameter.
#[derive(Debug)]
pub struct Param {
    pub name: String,
    pub ty: TypeName,
}

/// A declared type: a base type name, optionally an array of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub base: String,
    pub array: bool,
}

impl TypeName {
    pub fn new(base: impl Into<String>, array: bool) -> Self {
        TypeName {
            base: base.into(),
            array,
        }
    }

    /// The spelling the type resolver understands, e.g. `int[]`.
    pub fn spelling(&self) -> String {
        if self.array {
            format!("{}[]", self.base)
        } else {
            self.base.clone()
        }
    }
}

/// A statement.
#[derive(Debug)]
pub enum Stmt {
    Compound(Vec<Stmt>),
    Decl {
        ty: TypeName,
        name: String,
        init: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Expr(Expr),
    Empty,
}

/// An expression.
#[derive(Debug)]
pub enum Expr {
    IntLit(i64),
    FloatLit(f64),
    CharLit(char),
    StrLit(String),
    Ident(String),
    Assign {
        name: String,
        value: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Binary operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// C spelling of the operator.
    pub fn sign(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Unary operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    /// Unary minus that did not fold into a literal at parse time.
    Neg,
}

impl UnOp {
    pub fn sign(self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}
