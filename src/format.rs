//! Template file formats: path convention, encoding, and decoding.
//!
//! JSON output keeps document order and is pretty-printed with a configurable
//! indent, or written on one line in compact mode. TOML output uses
//! `toml_edit` so nested tables become `[section]` headers (pretty) or inline
//! tables (compact). TOML has no null, so null placeholders are written as
//! empty strings.
//!
//! Every encoded template ends with a newline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TemplateFormat {
    #[default]
    Json,
    Toml,
}

/// How an encoded template is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub pretty: bool,
    /// Spaces per nesting level in pretty JSON.
    pub indent: usize,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
        }
    }
}

impl TemplateFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TemplateFormat::Json => "json",
            TemplateFormat::Toml => "toml",
        }
    }

    /// Template path for a source file: extension stripped, then
    /// `.{format}.{suffix}` appended (`config.go` → `config.json.template`).
    pub fn template_path(self, source: &Path, suffix: &str) -> PathBuf {
        let mut name = source.with_extension("").into_os_string();
        name.push(".");
        name.push(self.extension());
        if !suffix.is_empty() {
            name.push(".");
            name.push(suffix);
        }
        PathBuf::from(name)
    }

    pub fn encode(self, doc: &Document, style: Style) -> Result<String, String> {
        let mut text = match self {
            TemplateFormat::Json => encode_json(doc, style)?,
            TemplateFormat::Toml => encode_toml(doc, style),
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    /// Parse a previously written template. The top level must be a table.
    pub fn decode(self, text: &str) -> Result<Document, String> {
        match self {
            TemplateFormat::Json => {
                let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
                Document::from_json(value)
                    .ok_or_else(|| "top-level value is not an object".to_string())
            }
            TemplateFormat::Toml => {
                let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
                Ok(Document::from_toml(table))
            }
        }
    }
}

impl std::fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

fn encode_json(doc: &Document, style: Style) -> Result<String, String> {
    if !style.pretty {
        return serde_json::to_string(doc).map_err(|e| e.to_string());
    }
    let indent = " ".repeat(style.indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer).map_err(|e| e.to_string())?;
    String::from_utf8(buf).map_err(|e| e.to_string())
}

fn encode_toml(doc: &Document, style: Style) -> String {
    let mut out = toml_edit::DocumentMut::new();
    fill_table(out.as_table_mut(), doc, style.pretty);
    out.to_string()
}

fn fill_table(table: &mut toml_edit::Table, doc: &Document, pretty: bool) {
    for (key, node) in doc.iter() {
        let item = match node {
            Node::Table(inner) if pretty => {
                let mut sub = toml_edit::Table::new();
                fill_table(&mut sub, inner, pretty);
                toml_edit::Item::Table(sub)
            }
            Node::Table(inner) => toml_edit::value(inline_table(inner)),
            Node::Leaf(value) => toml_edit::value(to_toml_value(value)),
        };
        table.insert(key, item);
    }
}

fn inline_table(doc: &Document) -> toml_edit::InlineTable {
    let mut table = toml_edit::InlineTable::new();
    for (key, node) in doc.iter() {
        let value = match node {
            Node::Table(inner) => toml_edit::Value::InlineTable(inline_table(inner)),
            Node::Leaf(value) => to_toml_value(value),
        };
        table.insert(key, value);
    }
    table
}

fn to_toml_value(value: &Value) -> toml_edit::Value {
    match value {
        Value::Null => toml_edit::Value::from(""),
        Value::Bool(b) => toml_edit::Value::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml_edit::Value::from(i),
            None => toml_edit::Value::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => toml_edit::Value::from(s.as_str()),
        Value::Array(items) => {
            let mut array = toml_edit::Array::new();
            for item in items {
                array.push(to_toml_value(item));
            }
            toml_edit::Value::Array(array)
        }
        Value::Object(map) => {
            let mut table = toml_edit::InlineTable::new();
            for (key, item) in map {
                table.insert(key.as_str(), to_toml_value(item));
            }
            toml_edit::Value::InlineTable(table)
        }
    }
}
