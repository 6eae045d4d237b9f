//! The template document: an ordered tree of tables and scalar leaves.
//!
//! Keys keep insertion order, so a freshly projected document lists fields in
//! source declaration order and serializes the same way. Leaves hold any JSON
//! value; a hand-edited template may put arrays (or even objects) where the
//! generator wrote a scalar placeholder.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// One level of a template document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: IndexMap<String, Node>,
}

/// A value in a [`Document`]: a nested table or a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Table(Document),
    Leaf(Value),
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under `key`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        self.entries.insert(key.into(), node);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Remove `key` without preserving the order of the remaining entries.
    pub(crate) fn take(&mut self, key: &str) -> Option<Node> {
        self.entries.swap_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigate by dotted key path (e.g. `"server.port"`).
    #[cfg(test)]
    pub(crate) fn get_path(&self, dotted_key: &str) -> Option<&Node> {
        let mut segments = dotted_key.split('.');
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            match node {
                Node::Table(table) => node = table.get(segment)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                Node::Table(table) => table.leaf_count(),
                Node::Leaf(_) => 1,
            })
            .sum()
    }

    /// Build from a JSON value. Only an object makes a document.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from(map)),
            _ => None,
        }
    }

    /// Build from a parsed TOML table.
    pub fn from_toml(table: toml::Table) -> Self {
        let mut doc = Self::new();
        for (key, value) in table {
            let node = match value {
                toml::Value::Table(inner) => Node::Table(Self::from_toml(inner)),
                other => Node::Leaf(toml_to_json(other)),
            };
            doc.insert(key, node);
        }
        doc
    }

    #[cfg(test)]
    pub(crate) fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, node)| (k.clone(), node.to_json()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        let mut doc = Self::new();
        for (key, value) in map {
            doc.insert(key, Node::from(value));
        }
        doc
    }
}

impl Node {
    #[cfg(test)]
    pub(crate) fn as_table(&self) -> Option<&Document> {
        match self {
            Node::Table(table) => Some(table),
            Node::Leaf(_) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Table(_) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn to_json(&self) -> Value {
        match self {
            Node::Table(table) => table.to_json(),
            Node::Leaf(value) => value.clone(),
        }
    }

    /// Collapse into a single JSON value; tables become objects.
    pub fn into_value(self) -> Value {
        match self {
            Node::Table(table) => Value::Object(
                table
                    .entries
                    .into_iter()
                    .map(|(k, node)| (k, node.into_value()))
                    .collect(),
            ),
            Node::Leaf(value) => value,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Table(Document::from(map)),
            other => Node::Leaf(other),
        }
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Table(table) => table.serialize(serializer),
            Node::Leaf(value) => value.serialize(serializer),
        }
    }
}
