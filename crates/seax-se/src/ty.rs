//! The type lattice of the symbolic value language.

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::expr::LiteralValue;

/// Closed set of types a symbolic expression can carry.
///
/// Types are compared by identity; there are no conversions at this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeType {
    Void,
    Int,
    Bool,
    Char,
    Float,
    IntArray,
    BoolArray,
    CharArray,
    FloatArray,
}

impl SeType {
    /// C-source spelling of the type.
    pub fn name(self) -> &'static str {
        match self {
            SeType::Void => "void",
            SeType::Int => "int",
            SeType::Bool => "bool",
            SeType::Char => "char",
            SeType::Float => "float",
            SeType::IntArray => "int[]",
            SeType::BoolArray => "bool[]",
            SeType::CharArray => "char[]",
            SeType::FloatArray => "float[]",
        }
    }

    /// Resolves a type from its C-source spelling.
    pub fn from_name(name: &str) -> EngineResult<Self> {
        match name {
            "void" => Ok(SeType::Void),
            "int" => Ok(SeType::Int),
            "bool" => Ok(SeType::Bool),
            "char" => Ok(SeType::Char),
            "float" => Ok(SeType::Float),
            "int[]" => Ok(SeType::IntArray),
            "bool[]" => Ok(SeType::BoolArray),
            "char[]" => Ok(SeType::CharArray),
            "float[]" => Ok(SeType::FloatArray),
            _ => Err(EngineError::invariant(format!("unknown type: `{name}`"))),
        }
    }

    /// Value a declaration of this type starts with when no initializer is
    /// given. `Void` has no value.
    pub fn default_value(self) -> Option<LiteralValue> {
        match self {
            SeType::Void => None,
            SeType::Int => Some(LiteralValue::Int(0)),
            SeType::Bool => Some(LiteralValue::Bool(false)),
            SeType::Char => Some(LiteralValue::Char('\0')),
            SeType::Float => Some(LiteralValue::Float(0.0)),
            SeType::CharArray => Some(LiteralValue::Str(String::new())),
            SeType::IntArray | SeType::BoolArray | SeType::FloatArray => {
                Some(LiteralValue::Array(Vec::new()))
            }
        }
    }
}

impl fmt::Display for SeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
