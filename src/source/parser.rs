//! Recursive-descent parser for top-level Go type declarations.

use super::lexer::{Token, TokenKind};
use super::{Field, SourceFile, SyntaxError, TypeDecl, TypeExpr};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn file(mut self) -> Result<SourceFile, SyntaxError> {
        self.skip_semis();
        self.expect_word("package")?;
        let package = self.ident()?;
        self.end_of_decl()?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            match self.peek().clone() {
                TokenKind::Eof => break,
                TokenKind::Ident(word) if word == "type" => {
                    self.advance();
                    if self.eat_punct("(") {
                        loop {
                            self.skip_semis();
                            if self.eat_punct(")") {
                                break;
                            }
                            decls.push(self.type_spec()?);
                            if !self.at_punct(")") {
                                self.expect_semi()?;
                            }
                        }
                    } else {
                        decls.push(self.type_spec()?);
                    }
                    self.end_of_decl()?;
                }
                TokenKind::Ident(word)
                    if matches!(word.as_str(), "import" | "func" | "var" | "const") =>
                {
                    self.advance();
                    self.skip_decl();
                }
                _ => return Err(self.error("non-declaration statement outside function body")),
            }
        }

        Ok(SourceFile { package, decls })
    }

    // -- declarations -------------------------------------------------------

    fn type_spec(&mut self) -> Result<TypeDecl, SyntaxError> {
        let line = self.line();
        let name = self.ident()?;

        let generic = self.at_punct("[") && self.type_params_follow();
        if generic {
            self.skip_balanced("[", "]")?;
        }
        let alias = self.eat_punct("=");
        let ty = self.type_expr()?;

        Ok(TypeDecl {
            name,
            alias,
            generic,
            ty,
            line,
        })
    }

    /// After `type Name`, tell `[T any]` (type parameters) from `[N]T` or `[]T`.
    fn type_params_follow(&self) -> bool {
        matches!(self.peek_at(1), TokenKind::Ident(_))
            && !matches!(self.peek_at(2), TokenKind::Punct("]"))
    }

    /// Skip an `import`, `func`, `var` or `const` declaration.
    fn skip_decl(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => return,
                TokenKind::Punct("(" | "[" | "{") => depth += 1,
                TokenKind::Punct(")" | "]" | "}") => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    // -- types --------------------------------------------------------------

    fn type_expr(&mut self) -> Result<TypeExpr, SyntaxError> {
        match self.peek().clone() {
            TokenKind::Ident(word) => match word.as_str() {
                "struct" => {
                    self.advance();
                    self.struct_body()
                }
                "interface" => {
                    self.advance();
                    self.skip_balanced("{", "}")?;
                    Ok(TypeExpr::Interface)
                }
                "map" => {
                    self.advance();
                    self.expect_punct("[")?;
                    let key = self.type_expr()?;
                    self.expect_punct("]")?;
                    let value = self.type_expr()?;
                    Ok(TypeExpr::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    })
                }
                "chan" => {
                    self.advance();
                    self.eat_punct("<-");
                    Ok(TypeExpr::Chan(Box::new(self.type_expr()?)))
                }
                "func" => {
                    self.advance();
                    self.signature()?;
                    Ok(TypeExpr::Func)
                }
                _ => self.type_name(),
            },
            TokenKind::Punct("*") => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.type_expr()?)))
            }
            TokenKind::Punct("<-") => {
                self.advance();
                self.expect_word("chan")?;
                Ok(TypeExpr::Chan(Box::new(self.type_expr()?)))
            }
            TokenKind::Punct("[") => {
                if matches!(self.peek_at(1), TokenKind::Punct("]")) {
                    self.advance();
                    self.advance();
                    Ok(TypeExpr::Slice(Box::new(self.type_expr()?)))
                } else {
                    self.skip_balanced("[", "]")?;
                    Ok(TypeExpr::Array(Box::new(self.type_expr()?)))
                }
            }
            TokenKind::Punct("(") => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect_punct(")")?;
                Ok(inner)
            }
            _ => Err(self.error("expected type")),
        }
    }

    fn type_name(&mut self) -> Result<TypeExpr, SyntaxError> {
        let first = self.ident()?;
        let (package, name) = if self.eat_punct(".") {
            (Some(first), self.ident()?)
        } else {
            (None, first)
        };
        let type_args = self.at_punct("[");
        if type_args {
            self.skip_balanced("[", "]")?;
        }
        Ok(TypeExpr::Named {
            package,
            name,
            type_args,
        })
    }

    /// Skip a function signature: parameters and an optional result.
    fn signature(&mut self) -> Result<(), SyntaxError> {
        self.skip_balanced("(", ")")?;
        if self.at_punct("(") {
            self.skip_balanced("(", ")")?;
        } else if self.starts_type() {
            self.type_expr()?;
        }
        Ok(())
    }

    fn starts_type(&self) -> bool {
        match self.peek() {
            TokenKind::Ident(_) => true,
            TokenKind::Punct(p) => matches!(*p, "*" | "[" | "<-" | "("),
            _ => false,
        }
    }

    fn struct_body(&mut self) -> Result<TypeExpr, SyntaxError> {
        self.expect_punct("{")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.eat_punct("}") {
                break;
            }
            fields.push(self.field()?);
            if !self.at_punct("}") {
                self.expect_semi()?;
            }
        }
        Ok(TypeExpr::Struct(fields))
    }

    fn field(&mut self) -> Result<Field, SyntaxError> {
        let line = self.line();
        let embedded = match (self.peek(), self.peek_at(1)) {
            (TokenKind::Punct("*"), _) => true,
            (
                TokenKind::Ident(_),
                TokenKind::Punct(".") | TokenKind::Semi | TokenKind::Str(_) | TokenKind::Punct("}"),
            ) => true,
            // `List[int]` is an embedded instantiation; `Buf [4]byte` is a field.
            (TokenKind::Ident(_), TokenKind::Punct("[")) => {
                let after = self.past_brackets(1);
                matches!(
                    self.peek_at(after),
                    TokenKind::Semi | TokenKind::Str(_) | TokenKind::Punct("}")
                )
            }
            (TokenKind::Ident(_), _) => false,
            _ => return Err(self.error("expected field name or embedded type")),
        };
        let (names, ty) = if embedded {
            (Vec::new(), self.type_expr()?)
        } else {
            let mut names = vec![self.ident()?];
            while self.eat_punct(",") {
                names.push(self.ident()?);
            }
            (names, self.type_expr()?)
        };

        let tag = match self.peek().clone() {
            TokenKind::Str(tag) => {
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Ok(Field {
            names,
            ty,
            tag,
            line,
        })
    }

    // -- token helpers ------------------------------------------------------

    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)].kind
    }

    fn line(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].line
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        SyntaxError {
            line: token.line,
            column: token.column,
            message: format!("{}, found {}", message.into(), describe(&token.kind)),
        }
    }

    fn skip_semis(&mut self) {
        while matches!(self.peek(), TokenKind::Semi) {
            self.advance();
        }
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(self.peek(), TokenKind::Punct(q) if *q == p)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        let found = self.at_punct(p);
        if found {
            self.advance();
        }
        found
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), SyntaxError> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{p}'")))
        }
    }

    fn expect_semi(&mut self) -> Result<(), SyntaxError> {
        if matches!(self.peek(), TokenKind::Semi) {
            self.advance();
            Ok(())
        } else {
            Err(self.error("expected ';' or newline"))
        }
    }

    fn end_of_decl(&mut self) -> Result<(), SyntaxError> {
        if matches!(self.peek(), TokenKind::Eof) {
            return Ok(());
        }
        self.expect_semi()
    }

    fn expect_word(&mut self, word: &str) -> Result<(), SyntaxError> {
        match self.peek() {
            TokenKind::Ident(w) if w == word => {
                self.advance();
                Ok(())
            }
            _ => Err(self.error(format!("expected '{word}'"))),
        }
    }

    fn ident(&mut self) -> Result<String, SyntaxError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    /// Skip from an opening delimiter to its matching close, inclusive.
    /// Offset just past the `]` matching the `[` at `offset`, without consuming.
    fn past_brackets(&self, offset: usize) -> usize {
        let mut depth = 0usize;
        let mut at = offset;
        loop {
            match self.peek_at(at) {
                TokenKind::Eof => return at,
                TokenKind::Punct("[") => depth += 1,
                TokenKind::Punct("]") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return at + 1;
                    }
                }
                _ => {}
            }
            at += 1;
        }
    }

    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<(), SyntaxError> {
        self.expect_punct(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                TokenKind::Eof => return Err(self.error(format!("expected '{close}'"))),
                TokenKind::Punct(p) if *p == open => depth += 1,
                TokenKind::Punct(p) if *p == close => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("'{name}'"),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Literal(text) => format!("'{text}'"),
        TokenKind::Punct(p) => format!("'{p}'"),
        TokenKind::Semi => "newline".to_string(),
        TokenKind::Eof => "EOF".to_string(),
    }
}
