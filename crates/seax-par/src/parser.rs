//! Recursive descent parser with Pratt expression parsing.

use thiserror::Error;

use seax_lex::{tokenize, LexError, SpannedToken, Token};

use crate::ast::{BinOp, Expr, FunctionDef, Param, Stmt, TranslationUnit, TypeName, UnOp};

/// Fatal syntax error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {line}:{column}")]
    Unexpected {
        expected: String,
        found: Token,
        line: u32,
        column: u32,
    },
}

/// Binding powers for Pratt parsing; higher binds tighter.
mod bp {
    pub const MIN: u8 = 0;
    pub const OR: u8 = 2;
    pub const AND: u8 = 4;
    pub const EQUALITY: u8 = 6;
    pub const RELATIONAL: u8 = 8;
    pub const ADDITIVE: u8 = 10;
    pub const MULTIPLICATIVE: u8 = 12;
}

/// Parses a whole preprocessed source text.
pub fn parse(source: &str) -> Result<TranslationUnit, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_translation_unit()
}

/// Parser over a token stream.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// translation-unit := (function-definition | global-declaration)*
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut functions = Vec::new();
        let mut globals = Vec::new();

        while self.peek() != &Token::Eof {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;

            if self.peek() == &Token::LParen {
                // Prototypes carry no body and yield nothing here.
                if let Some(function) = self.parse_function_tail(ty, name)? {
                    functions.push(function);
                }
            } else {
                globals.push(self.parse_decl_tail(ty, name)?);
            }
        }

        Ok(TranslationUnit { functions, globals })
    }

    /// Parses `( params ) { body }` or `( params ) ;` after the declarator
    /// name; a prototype yields `None`.
    fn parse_function_tail(
        &mut self,
        return_type: TypeName,
        name: String,
    ) -> Result<Option<FunctionDef>, ParseError> {
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;

        if self.peek() == &Token::Semicolon {
            self.advance();
            return Ok(None);
        }

        let body = self.parse_compound()?;
        Ok(Some(FunctionDef {
            name,
            return_type,
            params,
            body,
        }))
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if self.peek() == &Token::RParen {
            return Ok(params);
        }
        // `f(void)` declares no parameters.
        if self.peek() == &Token::KwVoid && self.peek_at(1) == &Token::RParen {
            self.advance();
            return Ok(params);
        }

        loop {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            let ty = self.parse_array_suffix(ty)?;
            params.push(Param { name, ty });

            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                return Ok(params);
            }
        }
    }

    fn parse_type(&mut self) -> Result<TypeName, ParseError> {
        let base = match self.peek() {
            Token::KwVoid => "void",
            Token::KwInt => "int",
            Token::KwBool => "bool",
            Token::KwChar => "char",
            Token::KwFloat => "float",
            _ => return Err(self.unexpected("a type name")),
        };
        self.advance();
        Ok(TypeName::new(base, false))
    }

    /// `name[]` or `name[N]` turns a declared type into its array type.
    fn parse_array_suffix(&mut self, ty: TypeName) -> Result<TypeName, ParseError> {
        if self.peek() != &Token::LBracket {
            return Ok(ty);
        }
        self.advance();
        if let Token::Int(_) = self.peek() {
            self.advance();
        }
        self.expect(Token::RBracket)?;
        Ok(TypeName::new(ty.base, true))
    }

    fn parse_compound(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::LBrace)?;
        let mut items = Vec::new();
        while self.peek() != &Token::RBrace {
            if self.peek() == &Token::Eof {
                return Err(self.unexpected("`}`"));
            }
            items.push(self.parse_stmt()?);
        }
        self.advance();
        Ok(Stmt::Compound(items))
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Token::LBrace => self.parse_compound(),
            Token::Semicolon => {
                self.advance();
                Ok(Stmt::Empty)
            }
            Token::KwVoid | Token::KwInt | Token::KwBool | Token::KwChar | Token::KwFloat => {
                let ty = self.parse_type()?;
                let name = self.expect_ident()?;
                self.parse_decl_tail(ty, name)
            }
            Token::KwIf => self.parse_if(),
            Token::KwWhile => self.parse_while(),
            Token::KwReturn => {
                self.advance();
                let expr = if self.peek() == &Token::Semicolon {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(Token::Semicolon)?;
                Ok(Stmt::Return(expr))
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(Token::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Parses the rest of a declaration after `type name`.
    fn parse_decl_tail(&mut self, ty: TypeName, name: String) -> Result<Stmt, ParseError> {
        let ty = self.parse_array_suffix(ty)?;
        let init = if self.peek() == &Token::Assign {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        Ok(Stmt::Decl { ty, name, init })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::KwIf)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.peek() == &Token::KwElse {
            self.advance();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::KwWhile)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While { cond, body })
    }

    /// expression := assignment | binary-expression
    ///
    /// Assignment is right-associative and restricted to plain variable
    /// lvalues.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if let Token::Ident(name) = self.peek() {
            if self.peek_at(1) == &Token::Assign {
                let name = name.clone();
                self.advance();
                self.advance();
                let value = Box::new(self.parse_expr()?);
                return Ok(Expr::Assign { name, value });
            }
        }
        self.parse_binary(bp::MIN)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let (op, l_bp) = match binary_op(self.peek()) {
                Some(pair) => pair,
                None => break,
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(l_bp + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Bang => {
                self.advance();
                Ok(Expr::Unary {
                    op: UnOp::Not,
                    expr: Box::new(self.parse_unary()?),
                })
            }
            Token::Minus => {
                self.advance();
                // A minus applied to a numeric literal folds right here;
                // the symbolic algebra has no arithmetic negation.
                match self.parse_unary()? {
                    Expr::IntLit(v) => Ok(Expr::IntLit(-v)),
                    Expr::FloatLit(v) => Ok(Expr::FloatLit(-v)),
                    expr => Ok(Expr::Unary {
                        op: UnOp::Neg,
                        expr: Box::new(expr),
                    }),
                }
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let expr = match self.peek().clone() {
            Token::Int(v) => {
                self.advance();
                Expr::IntLit(v)
            }
            Token::Float(v) => {
                self.advance();
                Expr::FloatLit(v)
            }
            Token::Char(c) => {
                self.advance();
                Expr::CharLit(c)
            }
            Token::Str(s) => {
                self.advance();
                Expr::StrLit(s)
            }
            Token::Ident(name) => {
                self.advance();
                if self.peek() == &Token::LParen {
                    self.advance();
                    let args = self.parse_args()?;
                    self.expect(Token::RParen)?;
                    Expr::Call { name, args }
                } else {
                    Expr::Ident(name)
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                inner
            }
            _ => return Err(self.unexpected("an expression")),
        };
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.peek() == &Token::RParen {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                return Ok(args);
            }
        }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let spanned = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: spanned.token.clone(),
            line: spanned.line,
            column: spanned.column,
        }
    }
}

fn binary_op(token: &Token) -> Option<(BinOp, u8)> {
    let pair = match token {
        Token::OrOr => (BinOp::Or, bp::OR),
        Token::AndAnd => (BinOp::And, bp::AND),
        Token::EqEq => (BinOp::Eq, bp::EQUALITY),
        Token::Ne => (BinOp::Ne, bp::EQUALITY),
        Token::Lt => (BinOp::Lt, bp::RELATIONAL),
        Token::Le => (BinOp::Le, bp::RELATIONAL),
        Token::Gt => (BinOp::Gt, bp::RELATIONAL),
        Token::Ge => (BinOp::Ge, bp::RELATIONAL),
        Token::Plus => (BinOp::Add, bp::ADDITIVE),
        Token::Minus => (BinOp::Sub, bp::ADDITIVE),
        Token::Star => (BinOp::Mul, bp::MULTIPLICATIVE),
        Token::Slash => (BinOp::Div, bp::MULTIPLICATIVE),
        _ => return None,
    };
    Some(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> TranslationUnit {
        parse(source).unwrap()
    }

    #[test]
    fn parses_a_simple_function() {
        let unit = parse_ok("int f(int x) { return x; }");
        assert_eq!(unit.functions.len(), 1);
        let f = &unit.functions[0];
        assert_eq!(f.name, "f");
        assert_eq!(f.return_type.spelling(), "int");
        assert_eq!(f.params.len(), 1);
        assert_eq!(f.params[0].ty.spelling(), "int");
    }

    #[test]
    fn parses_precedence() {
        let unit = parse_ok("int f() { return 1 + 2 * 3 > 4 && 0 == 1; }");
        let body = match &unit.functions[0].body {
            Stmt::Compound(items) => items,
            other => panic!("expected compound, got {other:?}"),
        };
        let expr = match &body[0] {
            Stmt::Return(Some(expr)) => expr,
            other => panic!("expected return, got {other:?}"),
        };
        // ((1 + (2 * 3)) > 4) && (0 == 1)
        match expr {
            Expr::Binary {
                op: BinOp::And,
                lhs,
                ..
            } => match lhs.as_ref() {
                Expr::Binary { op: BinOp::Gt, .. } => {}
                other => panic!("expected `>` on the left of `&&`, got {other:?}"),
            },
            other => panic!("expected `&&` at the root, got {other:?}"),
        }
    }

    #[test]
    fn folds_negative_literals() {
        let unit = parse_ok("int f() { return -1; }");
        let body = match &unit.functions[0].body {
            Stmt::Compound(items) => items,
            other => panic!("expected compound, got {other:?}"),
        };
        assert!(matches!(body[0], Stmt::Return(Some(Expr::IntLit(-1)))));
    }

    #[test]
    fn parses_if_else_and_while() {
        let unit = parse_ok(
            "int f(int x) { if (x > 0) x = 1; else { x = 2; } while (x < 5) x = x + 1; return x; }",
        );
        let body = match &unit.functions[0].body {
            Stmt::Compound(items) => items,
            other => panic!("expected compound, got {other:?}"),
        };
        assert!(matches!(
            body[0],
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
        assert!(matches!(body[1], Stmt::While { .. }));
    }

    #[test]
    fn parses_declarations() {
        let unit = parse_ok("int f() { int a; int b = 2; int c[4]; bool d[] ; return b; }");
        let body = match &unit.functions[0].body {
            Stmt::Compound(items) => items,
            other => panic!("expected compound, got {other:?}"),
        };
        assert!(matches!(&body[0], Stmt::Decl { init: None, .. }));
        assert!(matches!(&body[1], Stmt::Decl { init: Some(_), .. }));
        match &body[2] {
            Stmt::Decl { ty, .. } => assert_eq!(ty.spelling(), "int[]"),
            other => panic!("expected declaration, got {other:?}"),
        }
        match &body[3] {
            Stmt::Decl { ty, .. } => assert_eq!(ty.spelling(), "bool[]"),
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_calls_and_assignment() {
        let unit = parse_ok("int g(int a, int b) { int r; r = g(1, 2 + 3); return r; }");
        let body = match &unit.functions[0].body {
            Stmt::Compound(items) => items,
            other => panic!("expected compound, got {other:?}"),
        };
        match &body[1] {
            Stmt::Expr(Expr::Assign { name, value }) => {
                assert_eq!(name, "r");
                match value.as_ref() {
                    Expr::Call { name, args } => {
                        assert_eq!(name, "g");
                        assert_eq!(args.len(), 2);
                    }
                    other => panic!("expected call, got {other:?}"),
                }
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn separates_globals_and_skips_prototypes() {
        let unit = parse_ok("int counter = 0; int f(int x); int f(int x) { return x; }");
        assert_eq!(unit.globals.len(), 1);
        assert_eq!(unit.functions.len(), 1);
    }

    #[test]
    fn void_parameter_list_is_empty() {
        let unit = parse_ok("int f(void) { return 1; }");
        assert!(unit.functions[0].params.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse("int f() { return 1 + ; }"),
            Err(ParseError::Unexpected { .. })
        ));
    }
}
