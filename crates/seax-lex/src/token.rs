//! Token definitions for the C subset.

use std::fmt;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),

    // Type keywords
    KwVoid,
    KwInt,
    KwBool,
    KwChar,
    KwFloat,

    // Statement keywords
    KwIf,
    KwElse,
    KwWhile,
    KwReturn,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    // Operators
    Assign,
    Bang,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    EqEq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "`{name}`"),
            Token::Int(v) => write!(f, "`{v}`"),
            Token::Float(v) => write!(f, "`{v}`"),
            Token::Char(c) => write!(f, "`'{c}'`"),
            Token::Str(s) => write!(f, "`\"{s}\"`"),
            Token::KwVoid => f.write_str("`void`"),
            Token::KwInt => f.write_str("`int`"),
            Token::KwBool => f.write_str("`bool`"),
            Token::KwChar => f.write_str("`char`"),
            Token::KwFloat => f.write_str("`float`"),
            Token::KwIf => f.write_str("`if`"),
            Token::KwElse => f.write_str("`else`"),
            Token::KwWhile => f.write_str("`while`"),
            Token::KwReturn => f.write_str("`return`"),
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::LBrace => f.write_str("`{`"),
            Token::RBrace => f.write_str("`}`"),
            Token::LBracket => f.write_str("`[`"),
            Token::RBracket => f.write_str("`]`"),
            Token::Semicolon => f.write_str("`;`"),
            Token::Comma => f.write_str("`,`"),
            Token::Assign => f.write_str("`=`"),
            Token::Bang => f.write_str("`!`"),
            Token::AndAnd => f.write_str("`&&`"),
            Token::OrOr => f.write_str("`||`"),
            Token::Plus => f.write_str("`+`"),
            Token::Minus => f.write_str("`-`"),
            Token::Star => f.write_str("`*`"),
            Token::Slash => f.write_str("`/`"),
            Token::EqEq => f.write_str("`==`"),
            Token::Ne => f.write_str("`!=`"),
            Token::Gt => f.write_str("`>`"),
            Token::Ge => f.write_str("`>=`"),
            Token::Lt => f.write_str("`<`"),
            Token::Le => f.write_str("`<=`"),
            Token::Eof => f.write_str("end of file"),
        }
    }
}

/// A token with the position where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}
