//! The lexer proper.

use thiserror::Error;

use crate::cursor::Cursor;
use crate::token::{SpannedToken, Token};

/// Fatal lexical error.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("unknown character `{ch}` at {line}:{column}")]
    UnknownCharacter { ch: char, line: u32, column: u32 },

    #[error("invalid number literal `{text}` at {line}:{column}")]
    InvalidNumber {
        text: String,
        line: u32,
        column: u32,
    },

    #[error("unterminated character literal at {line}:{column}")]
    UnterminatedChar { line: u32, column: u32 },

    #[error("unterminated string literal at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    #[error("unterminated block comment at {line}:{column}")]
    UnterminatedComment { line: u32, column: u32 },
}

/// Lexer for the preprocessed-C subset.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    token_line: u32,
    token_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            token_line: 1,
            token_column: 1,
        }
    }

    /// Returns the next token, or `Token::Eof` at end of input.
    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        self.skip_trivia()?;

        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.spanned(Token::Eof));
        }

        let c = self.cursor.current_char();
        match c {
            '(' => Ok(self.single(Token::LParen)),
            ')' => Ok(self.single(Token::RParen)),
            '{' => Ok(self.single(Token::LBrace)),
            '}' => Ok(self.single(Token::RBrace)),
            '[' => Ok(self.single(Token::LBracket)),
            ']' => Ok(self.single(Token::RBracket)),
            ';' => Ok(self.single(Token::Semicolon)),
            ',' => Ok(self.single(Token::Comma)),
            '+' => Ok(self.single(Token::Plus)),
            '-' => Ok(self.single(Token::Minus)),
            '*' => Ok(self.single(Token::Star)),
            '/' => Ok(self.single(Token::Slash)),
            '=' => Ok(self.one_or_two(Token::Assign, '=', Token::EqEq)),
            '!' => Ok(self.one_or_two(Token::Bang, '=', Token::Ne)),
            '<' => Ok(self.one_or_two(Token::Lt, '=', Token::Le)),
            '>' => Ok(self.one_or_two(Token::Gt, '=', Token::Ge)),
            '&' => self.pair('&', Token::AndAnd),
            '|' => self.pair('|', Token::OrOr),
            '\'' => self.lex_char(),
            '"' => self.lex_string(),
            _ if c.is_ascii_digit() => self.lex_number(),
            _ if c.is_ascii_alphabetic() || c == '_' => Ok(self.lex_ident()),
            _ => Err(LexError::UnknownCharacter {
                ch: c,
                line: self.token_line,
                column: self.token_column,
            }),
        }
    }

    fn spanned(&self, token: Token) -> SpannedToken {
        SpannedToken {
            token,
            line: self.token_line,
            column: self.token_column,
        }
    }

    fn single(&mut self, token: Token) -> SpannedToken {
        self.cursor.advance();
        self.spanned(token)
    }

    /// Lexes `short` or, when the next character is `next`, `long`.
    fn one_or_two(&mut self, short: Token, next: char, long: Token) -> SpannedToken {
        self.cursor.advance();
        if self.cursor.current_char() == next {
            self.cursor.advance();
            self.spanned(long)
        } else {
            self.spanned(short)
        }
    }

    /// Lexes a two-character operator whose halves are identical.
    fn pair(&mut self, second: char, token: Token) -> Result<SpannedToken, LexError> {
        self.cursor.advance();
        if self.cursor.current_char() == second {
            self.cursor.advance();
            Ok(self.spanned(token))
        } else {
            Err(LexError::UnknownCharacter {
                ch: second,
                line: self.token_line,
                column: self.token_column,
            })
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            let c = self.cursor.current_char();
            if c.is_whitespace() {
                self.cursor.advance();
            } else if c == '#' {
                // Preprocessor linemarker or directive: skip the line.
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
            } else if c == '/' && self.cursor.peek_next() == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
            } else if c == '/' && self.cursor.peek_next() == '*' {
                let line = self.cursor.line();
                let column = self.cursor.column();
                self.cursor.advance();
                self.cursor.advance();
                loop {
                    if self.cursor.is_at_end() {
                        return Err(LexError::UnterminatedComment { line, column });
                    }
                    if self.cursor.current_char() == '*' && self.cursor.peek_next() == '/' {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
            } else {
                return Ok(());
            }
        }
    }

    fn lex_number(&mut self) -> Result<SpannedToken, LexError> {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_next().is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(start);
        let invalid = || LexError::InvalidNumber {
            text: text.to_string(),
            line: self.token_line,
            column: self.token_column,
        };

        let token = if is_float {
            Token::Float(text.parse().map_err(|_| invalid())?)
        } else {
            Token::Int(text.parse().map_err(|_| invalid())?)
        };
        Ok(self.spanned(token))
    }

    fn lex_ident(&mut self) -> SpannedToken {
        let start = self.cursor.position();
        loop {
            let c = self.cursor.current_char();
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.cursor.advance();
        }

        let token = match self.cursor.slice_from(start) {
            "void" => Token::KwVoid,
            "int" => Token::KwInt,
            "bool" | "_Bool" => Token::KwBool,
            "char" => Token::KwChar,
            "float" => Token::KwFloat,
            "if" => Token::KwIf,
            "else" => Token::KwElse,
            "while" => Token::KwWhile,
            "return" => Token::KwReturn,
            name => Token::Ident(name.to_string()),
        };
        self.spanned(token)
    }

    fn lex_char(&mut self) -> Result<SpannedToken, LexError> {
        let unterminated = LexError::UnterminatedChar {
            line: self.token_line,
            column: self.token_column,
        };
        self.cursor.advance();
        if self.cursor.is_at_end() {
            return Err(unterminated);
        }

        let c = match self.cursor.current_char() {
            '\\' => {
                self.cursor.advance();
                unescape(self.cursor.current_char())
            }
            c => c,
        };
        self.cursor.advance();

        if self.cursor.current_char() != '\'' {
            return Err(unterminated);
        }
        self.cursor.advance();
        Ok(self.spanned(Token::Char(c)))
    }

    fn lex_string(&mut self) -> Result<SpannedToken, LexError> {
        let unterminated = LexError::UnterminatedString {
            line: self.token_line,
            column: self.token_column,
        };
        self.cursor.advance();

        let mut text = String::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return Err(unterminated);
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Ok(self.spanned(Token::Str(text)));
                }
                '\\' => {
                    self.cursor.advance();
                    text.push(unescape(self.cursor.current_char()));
                    self.cursor.advance();
                }
                c => {
                    text.push(c);
                    self.cursor.advance();
                }
            }
        }
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Lexes a whole source text, ending with `Token::Eof`.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.token == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn lexes_a_function_header() {
        assert_eq!(
            kinds("int f(int x)"),
            vec![
                Token::KwInt,
                Token::Ident("f".to_string()),
                Token::LParen,
                Token::KwInt,
                Token::Ident("x".to_string()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_operators() {
        assert_eq!(
            kinds("a && b || !c == d != e <= f >= g"),
            vec![
                Token::Ident("a".to_string()),
                Token::AndAnd,
                Token::Ident("b".to_string()),
                Token::OrOr,
                Token::Bang,
                Token::Ident("c".to_string()),
                Token::EqEq,
                Token::Ident("d".to_string()),
                Token::Ne,
                Token::Ident("e".to_string()),
                Token::Le,
                Token::Ident("f".to_string()),
                Token::Ge,
                Token::Ident("g".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn lexes_literals() {
        assert_eq!(
            kinds("42 3.5 'a' \"hi\\n\""),
            vec![
                Token::Int(42),
                Token::Float(3.5),
                Token::Char('a'),
                Token::Str("hi\n".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments_and_linemarkers() {
        let source = "# 1 \"t.c\"\n// line\nint /* block */ x;";
        assert_eq!(
            kinds(source),
            vec![
                Token::KwInt,
                Token::Ident("x".to_string()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn underscore_bool_is_bool() {
        assert_eq!(kinds("_Bool"), vec![Token::KwBool, Token::Eof]);
    }

    #[test]
    fn lone_ampersand_is_rejected() {
        assert!(matches!(
            tokenize("a & b"),
            Err(LexError::UnknownCharacter { ch: '&', .. })
        ));
    }

    #[test]
    fn tracks_positions() {
        let tokens = tokenize("int\n  x").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }
}
