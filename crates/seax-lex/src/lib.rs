//! seax-lex - Lexer for the preprocessed-C subset
//!
//! Turns preprocessed C text into a token stream. Preprocessor linemarkers
//! (lines starting with `#`) are skipped, so the output of `cpp` lexes
//! directly. An unknown character is a fatal lexical error.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, LexError, Lexer};
pub use token::{SpannedToken, Token};
