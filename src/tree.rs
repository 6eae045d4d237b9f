//! The resolved shape of a root type.
//!
//! A [`TypeNode`] is either a branch (a struct with at least one field) or a
//! leaf. Leaves carry no value of their own: their placeholder is derived from
//! [`Kind`] on demand, so the resolver only has to record what it saw.

use serde_json::Value;

/// Declared type category of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// A struct, declared inline or reached through a named type or pointer.
    Struct,
    /// A named type that is not expanded, e.g. `string`, `int64`, `LogLevel`.
    Named(String),
    /// A type shape the resolver does not expand (slices, maps, `pkg.Type`, ...).
    Unknown,
}

impl Kind {
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    /// Placeholder written into a fresh template for a leaf of this kind.
    pub fn placeholder(&self) -> Value {
        let Kind::Named(name) = self else {
            return Value::Null;
        };
        match name.as_str() {
            "string" => Value::String(String::new()),
            "bool" => Value::Bool(false),
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" => Value::from(0),
            "float32" | "float64" => Value::from(0.0),
            _ => Value::Null,
        }
    }
}

/// One field of the resolved type, or the synthetic root.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: Kind,
    /// Template key for this field. Empty for the root and for untagged fields.
    pub name: String,
    pub children: Vec<TypeNode>,
}

impl TypeNode {
    pub fn leaf(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            kind,
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// A struct node. A struct without fields is still a leaf (null placeholder).
    pub fn record(name: impl Into<String>, children: Vec<TypeNode>) -> Self {
        Self {
            kind: Kind::Struct,
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The leaf placeholder; `None` for branch nodes.
    pub fn default_value(&self) -> Option<Value> {
        self.is_leaf().then(|| self.kind.placeholder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholders_follow_builtin_kinds() {
        assert_eq!(Kind::named("string").placeholder(), json!(""));
        assert_eq!(Kind::named("bool").placeholder(), json!(false));
        assert_eq!(Kind::named("int").placeholder(), json!(0));
        assert_eq!(Kind::named("uint16").placeholder(), json!(0));
        assert_eq!(Kind::named("float64").placeholder(), json!(0.0));
    }

    #[test]
    fn non_builtin_kinds_use_null() {
        assert_eq!(Kind::named("LogLevel").placeholder(), Value::Null);
        assert_eq!(Kind::named("complex128").placeholder(), Value::Null);
        assert_eq!(Kind::Unknown.placeholder(), Value::Null);
        assert_eq!(Kind::Struct.placeholder(), Value::Null);
    }

    #[test]
    fn branch_has_no_default_value() {
        let node = TypeNode::record("server", vec![TypeNode::leaf("port", Kind::named("int"))]);
        assert!(!node.is_leaf());
        assert_eq!(node.default_value(), None);
    }

    #[test]
    fn empty_struct_is_a_null_leaf() {
        let node = TypeNode::record("empty", vec![]);
        assert!(node.is_leaf());
        assert_eq!(node.default_value(), Some(Value::Null));
    }
}
