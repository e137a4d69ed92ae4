//! The parse tree: elements, text leaves, comment leaves.
//!
//! `Node` carries exactly one of the three shapes (element, text, comment),
//! modeled as an enum rather than an "all fields optional" struct so the
//! invariant ("exactly one of element/text/comment populated") is enforced
//! by the type itself. `PartialEq` on `Node` ignores `range` — equality
//! between nodes is structural content only — which is why it's a
//! hand-written impl rather than `#[derive(PartialEq)]`, which would
//! include it.

use crate::position::Range;
use serde::{Deserialize, Serialize};

/// Which bracket pair, if any, enclosed an element's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    None,
    Normal,
    Group,
    Generic,
}

/// The three node shapes a parse tree is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Element {
        name: String,
        children: Vec<Node>,
        attributes: Vec<(String, String)>,
        block_type: BlockType,
    },
    Text(String),
    Comment(String),
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                NodeKind::Element { name: n1, children: c1, attributes: a1, block_type: b1 },
                NodeKind::Element { name: n2, children: c2, attributes: a2, block_type: b2 },
            ) => n1 == n2 && c1 == c2 && a1 == a2 && b1 == b2,
            (NodeKind::Text(t1), NodeKind::Text(t2)) => t1 == t2,
            (NodeKind::Comment(c1), NodeKind::Comment(c2)) => c1 == c2,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Range,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Discriminates which of the three node shapes a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Element,
    Text,
    Comment,
}

impl Node {
    pub fn element(name: impl Into<String>, range: Range) -> Self {
        Self {
            kind: NodeKind::Element {
                name: name.into(),
                children: Vec::new(),
                attributes: Vec::new(),
                block_type: BlockType::None,
            },
            range,
        }
    }

    pub fn text(value: impl Into<String>, range: Range) -> Self {
        Self { kind: NodeKind::Text(value.into()), range }
    }

    pub fn comment(value: impl Into<String>, range: Range) -> Self {
        Self { kind: NodeKind::Comment(value.into()), range }
    }

    pub fn shape(&self) -> NodeShape {
        match self.kind {
            NodeKind::Element { .. } => NodeShape::Element,
            NodeKind::Text(_) => NodeShape::Text,
            NodeKind::Comment(_) => NodeShape::Comment,
        }
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        match self.kind {
            NodeKind::Element { block_type, .. } => Some(block_type),
            _ => None,
        }
    }

    pub fn set_block_type(&mut self, new_block_type: BlockType) {
        if let NodeKind::Element { block_type, .. } = &mut self.kind {
            *block_type = new_block_type;
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
            }
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Insert an attribute, failing if the key is already present —
    /// attribute keys within one node must be unique.
    pub fn try_insert_attribute(&mut self, key: String, value: String) -> Result<(), String> {
        match &mut self.kind {
            NodeKind::Element { attributes, .. } => {
                if attributes.iter().any(|(k, _)| *k == key) {
                    Err(key)
                } else {
                    attributes.push((key, value));
                    Ok(())
                }
            }
            _ => Err(key),
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// First text-leaf child's content, used by the unmarshal facade to
    /// read a scalar field's source text.
    pub fn first_text_child(&self) -> Option<&str> {
        self.children().iter().find_map(|c| c.text_content())
    }
}

/// The parsed document: always rooted at an element named `root` with
/// `block_type = Normal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub fn new(root: Node) -> Self {
        debug_assert_eq!(root.name(), Some("root"));
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// Render the tree as its structural-equivalence-to-XML projection:
/// element → element, attribute → attribute, text leaf → text node,
/// comment leaf → XML comment. Used by consumers and by the idempotence
/// tests (with the matching re-parser in `tadl-core/tests`).
pub fn to_xml_string(tree: &Tree) -> String {
    let mut out = String::new();
    write_node(tree.root(), &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(text) => out.push_str(&xml_escape(text)),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element { name, children, attributes, .. } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&xml_escape(v));
                out.push('"');
            }
            if children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn r() -> Range {
        Range::point(0, Position::default())
    }

    #[test]
    fn equality_ignores_range() {
        let a = Node::text("hi", Range::point(0, Position::new(0, 0)));
        let b = Node::text("hi", Range::point(5, Position::new(1, 2)));
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_attribute_key_rejected() {
        let mut el = Node::element("item", r());
        el.try_insert_attribute("id".to_string(), "1".to_string()).unwrap();
        let err = el.try_insert_attribute("id".to_string(), "2".to_string());
        assert_eq!(err, Err("id".to_string()));
    }

    #[test]
    fn xml_projection_maps_shapes() {
        let mut root = Node::element("root", r());
        root.set_block_type(BlockType::Normal);
        let mut hello = Node::element("hello", r());
        hello.set_block_type(BlockType::Normal);
        hello.children_mut().unwrap().push(Node::text("world", r()));
        root.children_mut().unwrap().push(hello);
        let tree = Tree::new(root);
        assert_eq!(to_xml_string(&tree), "<root><hello>world</hello></root>");
    }
}
