use serde_json::Value;
use tracing::trace;

use crate::document::{Document, Node};

/// Overlay the values of `existing` onto the shape of `fresh`.
///
/// `fresh` decides which keys exist; `existing` only supplies values.
/// If both sides have a table for the same key, recurse.
/// A fresh table is never replaced by a non-table.
/// A fresh leaf is replaced by whatever `existing` holds there, unless that is
/// absent or `null`.
/// Keys only present in `existing` are dropped.
pub fn merge(mut fresh: Document, mut existing: Document) -> Document {
    for (key, fresh_node) in fresh.iter_mut() {
        match (fresh_node, existing.take(key)) {
            (Node::Table(fresh_tbl), Some(Node::Table(existing_tbl))) => {
                let tbl = std::mem::take(fresh_tbl);
                *fresh_tbl = merge(tbl, existing_tbl);
            }
            (Node::Table(_), _) => {}
            (_, None | Some(Node::Leaf(Value::Null))) => {}
            (fresh_leaf, Some(existing_node)) => {
                *fresh_leaf = Node::Leaf(existing_node.into_value());
            }
        }
    }
    if !existing.is_empty() {
        trace!(keys = ?existing.keys().collect::<Vec<_>>(), "dropping obsolete keys");
    }
    fresh
}
