//! Structure resolution: turn a named struct declaration into a [`TypeNode`] tree.
//!
//! The resolver walks the root struct's fields in declaration order. Nested
//! structs are expanded whether they are written inline, referenced by name,
//! or reached through any number of pointers; everything else becomes a leaf
//! whose [`Kind`] records what was declared.
//!
//! Each field's template key comes from its struct tag (see [`StructTag`]).
//! A missing tag is not an error: the field is emitted under the empty key.

use tracing::{debug, trace};

use crate::error::TemplateError;
use crate::source::{Field, SourceFile, TypeDecl, TypeExpr};
use crate::tag::StructTag;
use crate::tree::{Kind, TypeNode};

/// Go's predeclared type names. Pointers to these are leaves, not lookups.
const PREDECLARED: &[&str] = &[
    "any",
    "bool",
    "byte",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Resolve the struct named `root` into a type tree.
///
/// `tag_key` selects which struct tag names the template keys
/// (`mapstructure` for viper configs).
pub fn resolve(file: &SourceFile, root: &str, tag_key: &str) -> Result<TypeNode, TemplateError> {
    let mut resolver = Resolver {
        file,
        tag_key,
        in_progress: Vec::new(),
    };
    let tree = resolver.root(root)?;
    debug!(root, fields = tree.children.len(), "resolved root type");
    Ok(tree)
}

struct Resolver<'a> {
    file: &'a SourceFile,
    tag_key: &'a str,
    /// Named structs currently being expanded, outermost first.
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn root(&mut self, name: &str) -> Result<TypeNode, TemplateError> {
        let decl = self
            .file
            .find(name)
            .ok_or_else(|| TemplateError::RootNotFound(name.to_string()))?;
        debug!(root = name, line = decl.line, "found root declaration");
        let (decl, fields) = self
            .declared_struct(&decl.name)?
            .ok_or_else(|| TemplateError::RootNotStruct(name.to_string()))?;
        self.expand(&decl.name, "", fields)
    }

    /// Follow `type A B` and `type A = B` chains to a struct declaration.
    ///
    /// Returns `None` when `name` is not declared or does not end in a struct.
    fn declared_struct(
        &self,
        name: &str,
    ) -> Result<Option<(&'a TypeDecl, &'a [Field])>, TemplateError> {
        let file: &'a SourceFile = self.file;
        let mut current = name;
        for _ in 0..=file.decls.len() {
            let Some(decl) = file.find(current) else {
                return Ok(None);
            };
            if decl.generic {
                return Err(TemplateError::GenericType(decl.name.clone()));
            }
            match &decl.ty {
                TypeExpr::Struct(fields) => return Ok(Some((decl, fields.as_slice()))),
                TypeExpr::Named {
                    package: None,
                    name: next,
                    type_args: false,
                } => {
                    trace!(from = %decl.name, to = %next, alias = decl.alias, "following type");
                    current = next.as_str();
                }
                _ => return Ok(None),
            }
        }
        Ok(None)
    }

    /// Expand a named struct, guarding against types that contain themselves.
    fn expand(
        &mut self,
        type_name: &str,
        key: &str,
        fields: &'a [Field],
    ) -> Result<TypeNode, TemplateError> {
        if self.in_progress.iter().any(|n| n == type_name) {
            return Err(TemplateError::CyclicType(type_name.to_string()));
        }
        self.in_progress.push(type_name.to_string());
        let children = self.fields(fields)?;
        self.in_progress.pop();
        Ok(TypeNode::record(key, children))
    }

    fn fields(&mut self, fields: &'a [Field]) -> Result<Vec<TypeNode>, TemplateError> {
        let mut nodes = Vec::with_capacity(fields.len());
        for field in fields {
            let tag = field
                .tag
                .as_deref()
                .map(StructTag::parse)
                .unwrap_or_default();
            if field.tag.is_some() && tag.is_empty() {
                debug!(
                    field = %field.display_name(),
                    line = field.line,
                    "struct tag has no key:\"value\" pairs"
                );
            }
            let key = tag.name_for(self.tag_key);
            trace!(field = %field.display_name(), key = %key, "resolving field");

            let node = self.field(field, &key, &field.ty)?;
            // `A, B int` declares two fields sharing one tag.
            for _ in 1..field.names.len() {
                nodes.push(node.clone());
            }
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn field(
        &mut self,
        field: &'a Field,
        key: &str,
        ty: &'a TypeExpr,
    ) -> Result<TypeNode, TemplateError> {
        match ty {
            TypeExpr::Struct(fields) => Ok(TypeNode::record(key, self.fields(fields)?)),
            TypeExpr::Pointer(inner) => self.pointee(field, key, inner),
            TypeExpr::Named {
                package: None,
                name,
                type_args: false,
            } => match self.declared_struct(name)? {
                Some((decl, fields)) => self.expand(&decl.name, key, fields),
                None => Ok(TypeNode::leaf(key, Kind::named(name.as_str()))),
            },
            _ => Ok(TypeNode::leaf(key, Kind::Unknown)),
        }
    }

    /// Pointers are transparent: `*T` resolves exactly like `T`.
    fn pointee(
        &mut self,
        field: &'a Field,
        key: &str,
        target: &'a TypeExpr,
    ) -> Result<TypeNode, TemplateError> {
        match target {
            TypeExpr::Pointer(inner) => self.pointee(field, key, inner),
            TypeExpr::Named {
                package: None,
                name,
                type_args: false,
            } => {
                if self.file.find(name).is_some() {
                    self.field(field, key, target)
                } else if PREDECLARED.contains(&name.as_str()) {
                    Ok(TypeNode::leaf(key, Kind::named(name.as_str())))
                } else {
                    Err(TemplateError::UnresolvedPointer {
                        field: field.display_name(),
                        target: name.clone(),
                        line: field.line,
                    })
                }
            }
            TypeExpr::Named { .. } => Ok(TypeNode::leaf(key, Kind::Unknown)),
            other => self.field(field, key, other),
        }
    }
}
