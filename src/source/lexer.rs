//! Tokenizer for Go source.
//!
//! Produces the token stream the declaration parser needs, including the
//! semicolons Go inserts automatically at line ends. Token text inside function
//! bodies is lexed but never interpreted.

use super::SyntaxError;
use crate::tag::unquote;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifiers and keywords.
    Ident(String),
    /// A string literal with escapes resolved (raw strings verbatim).
    Str(String),
    /// Number or rune literal, kept as source text.
    Literal(String),
    Punct(&'static str),
    Semi,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

const PUNCTS: &[&str] = &[
    "...", "<-", "++", "--", "(", ")", "[", "]", "{", "}", ",", ".", ";", ":", "=", "*", "&",
    "+", "-", "/", "%", "^", "|", "<", ">", "!", "~",
];

/// Tokenize Go source. A leading byte order mark is ignored.
pub fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.newline_semi();
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.rest().starts_with("//") => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '/' if self.rest().starts_with("/*") => self.block_comment()?,
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                c if c.is_ascii_digit() => self.number(),
                '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => self.number(),
                c if c.is_alphabetic() || c == '_' => self.ident(),
                _ => self.punct()?,
            }
        }
        self.newline_semi();
        let (line, column) = (self.line, self.column);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line,
            column,
        });
        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    /// Insert the automatic semicolon Go adds after certain line-final tokens.
    fn newline_semi(&mut self) {
        let needs_semi = match self.tokens.last().map(|t| &t.kind) {
            Some(TokenKind::Ident(word)) => {
                !KEYWORDS.contains(&word.as_str())
                    || matches!(
                        word.as_str(),
                        "break" | "continue" | "fallthrough" | "return"
                    )
            }
            Some(TokenKind::Str(_) | TokenKind::Literal(_)) => true,
            Some(TokenKind::Punct(p)) => matches!(*p, ")" | "]" | "}" | "++" | "--"),
            _ => false,
        };
        if needs_semi {
            let (line, column) = (self.line, self.column);
            self.push(TokenKind::Semi, line, column);
        }
    }

    fn block_comment(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let Some(end) = self.rest()[2..].find("*/") else {
            return Err(SyntaxError {
                line,
                column,
                message: "comment not terminated".into(),
            });
        };
        let body = &self.rest()[..end + 4];
        let spans_lines = body.contains('\n');
        if spans_lines {
            self.newline_semi();
        }
        for _ in body.chars() {
            self.bump();
        }
        Ok(())
    }

    fn interpreted_string(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let start = self.pos;
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error("string literal not terminated")),
                Some('"') => break,
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let body = &self.src[start..self.pos];
        self.bump();
        let value = unquote(body).ok_or_else(|| SyntaxError {
            line,
            column,
            message: "invalid escape in string literal".into(),
        })?;
        self.push(TokenKind::Str(value), line, column);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError {
                        line,
                        column,
                        message: "raw string literal not terminated".into(),
                    });
                }
                Some('`') => break,
                Some(_) => {
                    self.bump();
                }
            }
        }
        let value = self.src[start..self.pos].replace('\r', "");
        self.bump();
        self.push(TokenKind::Str(value), line, column);
        Ok(())
    }

    fn rune(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error("rune literal not terminated")),
                Some('\'') => break,
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.bump();
        let text = self.src[start..self.pos].to_string();
        self.push(TokenKind::Literal(text), line, column);
        Ok(())
    }

    fn number(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
                break;
            }
            prev = c;
            self.bump();
        }
        let text = self.src[start..self.pos].to_string();
        self.push(TokenKind::Literal(text), line, column);
    }

    fn ident(&mut self) {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word = self.src[start..self.pos].to_string();
        self.push(TokenKind::Ident(word), line, column);
    }

    fn punct(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let Some(p) = PUNCTS.iter().find(|p| self.rest().starts_with(**p)) else {
            let c = self.peek().unwrap_or_default();
            return Err(self.error(format!("unexpected character '{c}'")));
        };
        for _ in 0..p.len() {
            self.bump();
        }
        let kind = if *p == ";" {
            TokenKind::Semi
        } else {
            TokenKind::Punct(p)
        };
        self.push(kind, line, column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.into())
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let tokens = tokenize("\u{feff}package config\n").unwrap();
        assert_eq!(tokens[0].kind, ident("package"));
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn byte_order_mark_elsewhere_is_rejected() {
        assert!(tokenize("package config\n\u{feff}").is_err());
    }

    #[test]
    fn semicolon_inserted_after_identifier() {
        assert_eq!(
            kinds("package config\n"),
            vec![ident("package"), ident("config"), TokenKind::Semi, TokenKind::Eof]
        );
    }

    #[test]
    fn no_semicolon_after_keyword() {
        assert_eq!(
            kinds("struct\n{"),
            vec![ident("struct"), TokenKind::Punct("{"), TokenKind::Eof]
        );
    }

    #[test]
    fn semicolon_after_closing_brace_and_at_eof() {
        assert_eq!(
            kinds("}\n}"),
            vec![
                TokenKind::Punct("}"),
                TokenKind::Semi,
                TokenKind::Punct("}"),
                TokenKind::Semi,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn raw_string_keeps_quotes() {
        assert_eq!(
            kinds(r#"`mapstructure:"port"`"#)[0],
            TokenKind::Str(r#"mapstructure:"port""#.into())
        );
    }

    #[test]
    fn interpreted_string_resolves_escapes() {
        assert_eq!(
            kinds(r#""key:\"name\"""#)[0],
            TokenKind::Str(r#"key:"name""#.into())
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("a // trailing\n/* block */ b"),
            vec![ident("a"), TokenKind::Semi, ident("b"), TokenKind::Semi, TokenKind::Eof]
        );
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        assert_eq!(
            kinds("a /* one\ntwo */ b"),
            vec![ident("a"), TokenKind::Semi, ident("b"), TokenKind::Semi, TokenKind::Eof]
        );
    }

    #[test]
    fn numbers_and_runes_are_literals() {
        assert_eq!(
            kinds("1.5e-3 'x' 0xFF"),
            vec![
                TokenKind::Literal("1.5e-3".into()),
                TokenKind::Literal("'x'".into()),
                TokenKind::Literal("0xFF".into()),
                TokenKind::Semi,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn multi_char_punctuation() {
        assert_eq!(
            kinds("<-chan ..."),
            vec![
                TokenKind::Punct("<-"),
                ident("chan"),
                TokenKind::Punct("..."),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("package a\ntype B int").unwrap();
        let b = tokens.iter().find(|t| t.kind == ident("B")).unwrap();
        assert_eq!((b.line, b.column), (2, 6));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("x := \"oops\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("not terminated"));
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let err = tokenize("a @ b").unwrap_err();
        assert!(err.message.contains('@'));
    }
}
