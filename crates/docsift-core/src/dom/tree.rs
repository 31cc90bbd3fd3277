//! tree.rs: arena-backed document tree
//!
//! Nodes live in a flat `Vec` and refer to each other by `NodeId`.
//! The root is a synthetic element named `#document`.
//!
//! Invariants:
//! - `children` lists are in document order.
//! - Every non-root node has exactly one parent, and appears exactly once in
//!   that parent's `children`.
//! - Text-bearing leaves (`Text`, `Highlight`) never have children.

use crate::error::{Error, Result};

/// Name of the synthetic root element.
pub const ROOT_NAME: &str = "#document";

/// Index of a node inside its owning `Tree`.
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Id of the `#document` root in every tree.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One attribute, kept exactly as it appeared in the source (value still escaped).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub raw_value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        name: String,
        attrs: Vec<Attribute>,
    },
    Text(String),
    /// Content of `script`/`style`: kept for rendering, never searched.
    RawText(String),
    /// A matched substring wrapped for emphasis; `match_index` is its position
    /// in the match list that produced it.
    Highlight {
        match_index: usize,
        text: String,
    },
}

#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Literal text for text-bearing leaves, `None` for elements.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Highlight { text, .. } => Some(text),
            NodeKind::Element { .. } | NodeKind::RawText(_) => None,
        }
    }

    /// True for nodes that may hold children.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Element name, `None` for leaves.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Arena of document nodes.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the `#document` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    name: ROOT_NAME.to_string(),
                    attrs: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds nothing but the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Look up a node; `None` if the id was issued by another tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node or fail with `UnknownNode`.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(Error::UnknownNode(id))
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId> {
        let parent_node = self
            .nodes
            .get(parent.index())
            .ok_or(Error::UnknownNode(parent))?;
        if !parent_node.is_element() {
            return Err(Error::NotAnElement(parent));
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Convenience for appending an element.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attrs: Vec<Attribute>,
    ) -> Result<NodeId> {
        self.append(
            parent,
            NodeKind::Element {
                name: name.into(),
                attrs,
            },
        )
    }

    /// Convenience for appending a text leaf.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Depth-first, left-to-right iterator over every node below `from`
    /// (`from` itself included).
    pub fn descendants(&self, from: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![from],
        }
    }

    /// First element with the given (case-insensitive) name, in document order.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root()).find(|&id| {
            self.get(id)
                .and_then(Node::name)
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Copy the subtrees below `src_parent` into `dst` under `dst_parent`,
    /// preserving order.
    ///
    /// Elements are copied as-is; every other node is handed to `on_leaf`,
    /// which appends whatever should stand in its place (possibly nothing,
    /// possibly several nodes).
    pub fn graft_children<F>(
        &self,
        src_parent: NodeId,
        dst: &mut Tree,
        dst_parent: NodeId,
        mut on_leaf: F,
    ) -> Result<()>
    where
        F: FnMut(NodeId, &Node, &mut Tree, NodeId) -> Result<()>,
    {
        let src = self.node(src_parent)?;
        let mut stack: Vec<(NodeId, NodeId)> = src
            .children
            .iter()
            .rev()
            .map(|&child| (child, dst_parent))
            .collect();

        while let Some((id, parent)) = stack.pop() {
            let node = self.node(id)?;
            if node.is_element() {
                let copy = dst.append(parent, node.kind.clone())?;
                stack.extend(node.children.iter().rev().map(|&child| (child, copy)));
            } else {
                on_leaf(id, node, dst, parent)?;
            }
        }
        Ok(())
    }

    /// Concatenated text of every leaf below `from`.
    pub fn text_content(&self, from: NodeId) -> String {
        self.descendants(from)
            .filter_map(|id| self.get(id).and_then(Node::text))
            .collect()
    }
}

/// Explicit-stack preorder walk; see [`Tree::descendants`].
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_walk_in_document_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", Vec::new()).unwrap();
        let a = tree.append_text(p, "one ").unwrap();
        let b = tree.append_element(p, "b", Vec::new()).unwrap();
        let c = tree.append_text(b, "two").unwrap();
        let d = tree.append_text(root, " three").unwrap();

        let order: Vec<_> = tree.descendants(root).collect();
        assert_eq!(order, vec![root, p, a, b, c, d]);
        assert_eq!(tree.text_content(root), "one two three");
        assert_eq!(tree.node(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_leaves_refuse_children() {
        let mut tree = Tree::new();
        let root = tree.root();
        let leaf = tree.append_text(root, "x").unwrap();
        assert!(matches!(
            tree.append_text(leaf, "y"),
            Err(Error::NotAnElement(_))
        ));
    }

    #[test]
    fn test_graft_copies_structure_and_maps_leaves() {
        let mut tree = Tree::new();
        let root = tree.root();
        let p = tree.append_element(root, "p", Vec::new()).unwrap();
        tree.append_text(p, "ab").unwrap();
        let i = tree.append_element(p, "i", Vec::new()).unwrap();
        tree.append_text(i, "cd").unwrap();

        let mut out = Tree::new();
        let out_root = out.root();
        tree.graft_children(root, &mut out, out_root, |_, node, dst, parent| {
            let upper = node.text().unwrap_or_default().to_uppercase();
            dst.append_text(parent, upper).map(|_| ())
        })
        .unwrap();

        assert_eq!(out.text_content(out.root()), "ABCD");
        assert_eq!(out.len(), tree.len());
        let out_i = out.find_element("i").unwrap();
        assert_eq!(out.text_content(out_i), "CD");
    }

    #[test]
    fn test_find_element_ignores_case() {
        let mut tree = Tree::new();
        let root = tree.root();
        let html = tree.append_element(root, "html", Vec::new()).unwrap();
        let body = tree.append_element(html, "BODY", Vec::new()).unwrap();
        assert_eq!(tree.find_element("body"), Some(body));
        assert_eq!(tree.find_element("head"), None);
        assert!(!tree.is_empty());
        assert!(Tree::new().is_empty());
    }
}
