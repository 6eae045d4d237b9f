//! Go source model: the top-level type declarations of one file.
//!
//! Only what template generation needs is kept. Type expressions are
//! described structurally, field tags are kept as raw strings, and every
//! other declaration (`func`, `var`, `const`, `import`) is skipped.

mod lexer;
mod parser;

use std::path::Path;

use crate::error::TemplateError;

/// A type expression as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Name`, `pkg.Name`, or an instantiation such as `List[int]`.
    Named {
        package: Option<String>,
        name: String,
        type_args: bool,
    },
    Pointer(Box<TypeExpr>),
    Struct(Vec<Field>),
    Slice(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan(Box<TypeExpr>),
    Func,
    Interface,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
            type_args: false,
        }
    }
}

/// One field declaration inside a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared names. Empty for an embedded field.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    /// Tag literal with quoting removed, e.g. `mapstructure:"port"`.
    pub tag: Option<String>,
    pub line: usize,
}

impl Field {
    /// Name used in diagnostics: the first declared name, or the embedded type.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.names.first() {
            return name.clone();
        }
        let mut ty = &self.ty;
        while let TypeExpr::Pointer(inner) = ty {
            ty = inner;
        }
        match ty {
            TypeExpr::Named { name, .. } => name.clone(),
            _ => "<embedded>".to_string(),
        }
    }
}

/// A top-level `type` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    /// `type A = B`
    pub alias: bool,
    /// Declared with type parameters, e.g. `type Box[T any] struct{...}`.
    pub generic: bool,
    pub ty: TypeExpr,
    pub line: usize,
}

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: String,
    pub decls: Vec<TypeDecl>,
}

/// A syntax error with its 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SourceFile {
    /// Parse Go source text.
    pub fn parse(src: &str) -> Result<Self, SyntaxError> {
        let tokens = lexer::tokenize(src)?;
        parser::Parser::new(tokens).file()
    }

    /// Read and parse a Go source file.
    pub fn read(path: &Path) -> Result<Self, TemplateError> {
        let src = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&src).map_err(|e| TemplateError::Parse {
            path: path.to_path_buf(),
            line: e.line,
            column: e.column,
            message: e.message,
        })
    }

    /// The first top-level type declaration named `name`.
    pub fn find(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.iter().find(|d| d.name == name)
    }
}
