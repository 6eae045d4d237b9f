use crate::document::{Document, Node};
use crate::tree::TypeNode;

/// Project a resolved type tree onto a fresh template document.
///
/// Every leaf gets the placeholder for its kind; every struct becomes a table
/// keyed by its children's names. The root's own name is ignored and the
/// result is always a table, even for a struct with no fields.
pub fn project(tree: &TypeNode) -> Document {
    let mut doc = Document::new();
    for child in &tree.children {
        let node = match child.default_value() {
            Some(placeholder) => Node::Leaf(placeholder),
            None => Node::Table(project(child)),
        };
        doc.insert(child.name.clone(), node);
    }
    doc
}
