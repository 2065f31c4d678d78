//! Symbolic expression trees.
//!
//! Expressions are plain values: constructors never simplify and every
//! operation builds a new tree. Equality and hashing are structural over
//! each variant's equality components:
//!
//! | Variant       | Components                       |
//! |---------------|----------------------------------|
//! | `Variable`    | `(context_id, name, se_type)`    |
//! | `Literal`     | `(value, se_type)`               |
//! | `Unary`       | `(arg)`                          |
//! | `Binary`      | `(lhs, rhs)`                     |
//! | `Conditional` | `(se_type, option identities)`   |
//!
//! The operator is deliberately not an equality component of the operator
//! nodes, and a value option takes part in comparisons through its identity
//! only.

use std::fmt;
use std::hash::{Hash, Hasher};

use seax_util::{ContextId, OptionId};

use crate::error::{EngineError, EngineResult};
use crate::ty::SeType;

/// Binary operators of the expression algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinOpKind {
    /// C-source spelling of the operator.
    pub fn sign(self) -> &'static str {
        match self {
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Eq => "==",
            BinOpKind::Ne => "!=",
            BinOpKind::Gt => ">",
            BinOpKind::Ge => ">=",
            BinOpKind::Lt => "<",
            BinOpKind::Le => "<=",
        }
    }

    /// Resolves an operator from its C-source spelling.
    pub fn from_sign(sign: &str) -> EngineResult<Self> {
        match sign {
            "&&" => Ok(BinOpKind::And),
            "||" => Ok(BinOpKind::Or),
            "+" => Ok(BinOpKind::Add),
            "-" => Ok(BinOpKind::Sub),
            "*" => Ok(BinOpKind::Mul),
            "/" => Ok(BinOpKind::Div),
            "==" => Ok(BinOpKind::Eq),
            "!=" => Ok(BinOpKind::Ne),
            ">" => Ok(BinOpKind::Gt),
            ">=" => Ok(BinOpKind::Ge),
            "<" => Ok(BinOpKind::Lt),
            "<=" => Ok(BinOpKind::Le),
            _ => Err(EngineError::invariant(format!(
                "unknown binary operator sign: `{sign}`"
            ))),
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign())
    }
}

/// Unary operators of the expression algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOpKind {
    Not,
}

impl UnOpKind {
    pub fn sign(self) -> &'static str {
        match self {
            UnOpKind::Not => "!",
        }
    }

    /// Resolves an operator from its C-source spelling.
    pub fn from_sign(sign: &str) -> EngineResult<Self> {
        match sign {
            "!" => Ok(UnOpKind::Not),
            _ => Err(EngineError::invariant(format!(
                "unknown unary operator sign: `{sign}`"
            ))),
        }
    }
}

impl fmt::Display for UnOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sign())
    }
}

/// Payload of a literal expression.
#[derive(Debug, Clone)]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Char(char),
    Float(f64),
    /// Backing value of a `char[]` literal.
    Str(String),
    /// Backing value of the remaining array types.
    Array(Vec<LiteralValue>),
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LiteralValue::Int(a), LiteralValue::Int(b)) => a == b,
            (LiteralValue::Bool(a), LiteralValue::Bool(b)) => a == b,
            (LiteralValue::Char(a), LiteralValue::Char(b)) => a == b,
            // Bit equality keeps Eq and Hash consistent for floats.
            (LiteralValue::Float(a), LiteralValue::Float(b)) => a.to_bits() == b.to_bits(),
            (LiteralValue::Str(a), LiteralValue::Str(b)) => a == b,
            (LiteralValue::Array(a), LiteralValue::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LiteralValue::Int(v) => v.hash(state),
            LiteralValue::Bool(v) => v.hash(state),
            LiteralValue::Char(v) => v.hash(state),
            LiteralValue::Float(v) => v.to_bits().hash(state),
            LiteralValue::Str(v) => v.hash(state),
            LiteralValue::Array(v) => v.hash(state),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Bool(v) => write!(f, "{v}"),
            LiteralValue::Char(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Str(v) => write!(f, "{v}"),
            LiteralValue::Array(vs) => {
                let parts: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// A named symbolic variable.
///
/// Carries the id of the context that declared it, so that two variables
/// with the same source name from sibling scopes never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub context_id: ContextId,
    pub name: String,
    pub se_type: SeType,
}

impl Variable {
    pub fn new(context_id: ContextId, name: impl Into<String>, se_type: SeType) -> Self {
        Variable {
            context_id,
            name: name.into(),
            se_type,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A typed constant.
#[derive(Debug, Clone)]
pub struct Literal {
    pub value: LiteralValue,
    pub se_type: SeType,
    /// Whether the literal was introduced by the engine rather than the
    /// source (implicit initialization). Not an equality component.
    pub implicit: bool,
}

impl Literal {
    /// Builds a literal, coercing `value` to `se_type`.
    ///
    /// An `se_type` that cannot carry a literal is a `NotImplemented`
    /// error; a value that cannot be coerced is a kind error.
    pub fn new(value: LiteralValue, se_type: SeType) -> EngineResult<Self> {
        Ok(Literal {
            value: coerce(value, se_type)?,
            se_type,
            implicit: false,
        })
    }

    /// Builds the implicit default literal of `se_type`.
    pub fn implicit_default(se_type: SeType) -> EngineResult<Self> {
        let value = se_type
            .default_value()
            .ok_or_else(|| EngineError::not_implemented(format!("literal of type `{se_type}`")))?;
        Ok(Literal {
            value,
            se_type,
            implicit: true,
        })
    }
}

fn coerce(value: LiteralValue, se_type: SeType) -> EngineResult<LiteralValue> {
    let kind_error = |value: &LiteralValue| {
        Err(EngineError::invariant(format!(
            "cannot coerce `{value}` to `{se_type}`"
        )))
    };

    match se_type {
        SeType::Int => match value {
            LiteralValue::Int(v) => Ok(LiteralValue::Int(v)),
            LiteralValue::Bool(v) => Ok(LiteralValue::Int(v as i64)),
            LiteralValue::Char(v) => Ok(LiteralValue::Int(v as i64)),
            LiteralValue::Float(v) => Ok(LiteralValue::Int(v as i64)),
            other => kind_error(&other),
        },
        SeType::Bool => match value {
            LiteralValue::Bool(v) => Ok(LiteralValue::Bool(v)),
            LiteralValue::Int(v) => Ok(LiteralValue::Bool(v != 0)),
            LiteralValue::Float(v) => Ok(LiteralValue::Bool(v != 0.0)),
            other => kind_error(&other),
        },
        SeType::Char => match value {
            LiteralValue::Char(v) => Ok(LiteralValue::Char(v)),
            other => kind_error(&other),
        },
        SeType::Float => match value {
            LiteralValue::Float(v) => Ok(LiteralValue::Float(v)),
            LiteralValue::Int(v) => Ok(LiteralValue::Float(v as f64)),
            LiteralValue::Bool(v) => Ok(LiteralValue::Float(v as i64 as f64)),
            other => kind_error(&other),
        },
        SeType::CharArray => match value {
            LiteralValue::Str(v) => Ok(LiteralValue::Str(v)),
            other => kind_error(&other),
        },
        SeType::IntArray | SeType::BoolArray | SeType::FloatArray => match value {
            LiteralValue::Array(v) => Ok(LiteralValue::Array(v)),
            other => kind_error(&other),
        },
        SeType::Void => Err(EngineError::not_implemented("literal of type `void`")),
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.se_type == other.se_type
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.se_type.hash(state);
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.se_type {
            SeType::Char => write!(f, "'{}'", self.value),
            SeType::CharArray => write!(f, "\"{}\"", self.value),
            SeType::Void => f.write_str("void"),
            SeType::Bool | SeType::Int | SeType::Float => write!(f, "{}", self.value),
            SeType::IntArray | SeType::BoolArray | SeType::FloatArray => {
                write!(f, "[{}]", self.value)
            }
        }
    }
}

/// Application of a unary operator.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnOpKind,
    pub arg: Box<Expr>,
}

impl UnaryExpr {
    pub fn new(op: UnOpKind, arg: Expr) -> Self {
        UnaryExpr {
            op,
            arg: Box::new(arg),
        }
    }
}

impl PartialEq for UnaryExpr {
    fn eq(&self, other: &Self) -> bool {
        self.arg == other.arg
    }
}

impl Eq for UnaryExpr {}

impl Hash for UnaryExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arg.hash(state);
    }
}

impl fmt::Display for UnaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.op, self.arg)
    }
}

/// Application of a binary operator.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinOpKind,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

impl BinaryExpr {
    pub fn new(lhs: Expr, rhs: Expr, op: BinOpKind) -> Self {
        BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl PartialEq for BinaryExpr {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for BinaryExpr {}

impl Hash for BinaryExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl fmt::Display for BinaryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op, self.rhs)
    }
}

/// A conditional symbolic value: one of the option's values, under the
/// option's condition.
#[derive(Debug, Clone)]
pub struct ValueOption {
    pub id: OptionId,
    pub condition: Expr,
    pub value: Expr,
}

impl ValueOption {
    /// Builds an option with a fresh identity.
    pub fn new(condition: Expr, value: Expr) -> Self {
        ValueOption {
            id: OptionId::fresh(),
            condition,
            value,
        }
    }

    /// Narrows the option: `condition := condition ∧ extra`.
    pub fn adjunct_condition(&mut self, extra: Expr) {
        let condition = std::mem::replace(&mut self.condition, se_true());
        self.condition = se_and(condition, extra);
    }
}

impl PartialEq for ValueOption {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueOption {}

impl Hash for ValueOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ValueOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.condition, self.value)
    }
}

/// An ordered sequence of conditional values inlined at a variable read.
///
/// Produced only by conditionalization.
#[derive(Debug, Clone)]
pub struct Conditional {
    pub se_type: SeType,
    pub options: Vec<ValueOption>,
}

impl Conditional {
    pub fn new(se_type: SeType, options: Vec<ValueOption>) -> Self {
        Conditional { se_type, options }
    }
}

impl PartialEq for Conditional {
    fn eq(&self, other: &Self) -> bool {
        self.se_type == other.se_type && self.options == other.options
    }
}

impl Eq for Conditional {}

impl Hash for Conditional {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.se_type.hash(state);
        for option in &self.options {
            option.hash(state);
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.options.iter().map(|o| o.to_string()).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Variable(Variable),
    Literal(Literal),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(Conditional),
}

impl Expr {
    /// The type the expression evaluates to.
    ///
    /// A binary operator requires both operands to have the same type;
    /// a mismatch is a kind error.
    pub fn se_type(&self) -> EngineResult<SeType> {
        match self {
            Expr::Variable(v) => Ok(v.se_type),
            Expr::Literal(l) => Ok(l.se_type),
            Expr::Unary(u) => u.arg.se_type(),
            Expr::Binary(b) => {
                let lhs = b.lhs.se_type()?;
                let rhs = b.rhs.se_type()?;
                if lhs != rhs {
                    return Err(EngineError::invariant(format!(
                        "incompatible types: `{lhs}` and `{rhs}`"
                    )));
                }
                Ok(lhs)
            }
            Expr::Conditional(c) => Ok(c.se_type),
        }
    }

    /// Whether the tree contains a `Conditional` node. Such trees cannot
    /// be lowered to SMT terms and must be flattened first.
    pub fn has_conditional(&self) -> bool {
        match self {
            Expr::Variable(_) | Expr::Literal(_) => false,
            Expr::Unary(u) => u.arg.has_conditional(),
            Expr::Binary(b) => b.lhs.has_conditional() || b.rhs.has_conditional(),
            Expr::Conditional(_) => true,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Variable(v) => v.fmt(f),
            Expr::Literal(l) => l.fmt(f),
            Expr::Unary(u) => u.fmt(f),
            Expr::Binary(b) => b.fmt(f),
            Expr::Conditional(c) => c.fmt(f),
        }
    }
}

impl From<Variable> for Expr {
    fn from(v: Variable) -> Self {
        Expr::Variable(v)
    }
}

impl From<Literal> for Expr {
    fn from(l: Literal) -> Self {
        Expr::Literal(l)
    }
}

/// The boolean literal `true`.
pub fn se_true() -> Expr {
    Expr::Literal(Literal {
        value: LiteralValue::Bool(true),
        se_type: SeType::Bool,
        implicit: false,
    })
}

/// The boolean literal `false`.
pub fn se_false() -> Expr {
    Expr::Literal(Literal {
        value: LiteralValue::Bool(false),
        se_type: SeType::Bool,
        implicit: false,
    })
}

/// `lhs && rhs`
pub fn se_and(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary(BinaryExpr::new(lhs, rhs, BinOpKind::And))
}

/// `lhs || rhs`
pub fn se_or(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary(BinaryExpr::new(lhs, rhs, BinOpKind::Or))
}

/// `!arg`
pub fn se_not(arg: Expr) -> Expr {
    Expr::Unary(UnaryExpr::new(UnOpKind::Not, arg))
}

/// Left-folds `args` under `op`: `[a, b, c]` becomes `((a op b) op c)`,
/// a single element is returned as is, and an empty sequence is `None`.
pub fn binop_from_args(op: BinOpKind, args: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    let mut acc: Option<Expr> = None;
    for arg in args {
        acc = Some(match acc {
            None => arg,
            Some(lhs) => Expr::Binary(BinaryExpr::new(lhs, arg, op)),
        });
    }
    acc
}
