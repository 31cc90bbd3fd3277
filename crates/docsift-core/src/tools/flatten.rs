//! Flattening indexer: one searchable string over every text leaf.

use crate::dom::{NodeId, Tree};
use crate::tools::model::ByteSpan;

/// One text-bearing node and where its text sits in the flattened string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLeaf<'t> {
    pub node: NodeId,
    pub text: &'t str,
    pub start: usize,
}

impl TextLeaf<'_> {
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn span(&self) -> ByteSpan {
        ByteSpan {
            start: self.start,
            end: self.end(),
        }
    }
}

/// Concatenated leaf text plus the leaf-to-offset map.
///
/// Leaf spans partition `text` exactly, in document order.
#[derive(Clone, Debug, Default)]
pub struct Flattened<'t> {
    pub text: String,
    pub leaves: Vec<TextLeaf<'t>>,
}

impl Flattened<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Walk `tree` depth-first, left to right, collecting every text leaf.
///
/// Empty leaves are kept with a zero-length span. Read-only.
pub fn flatten(tree: &Tree) -> Flattened<'_> {
    let mut flat = Flattened::default();
    for id in tree.descendants(tree.root()) {
        let Some(text) = tree.get(id).and_then(|n| n.text()) else {
            continue;
        };
        flat.leaves.push(TextLeaf {
            node: id,
            text,
            start: flat.text.len(),
        });
        flat.text.push_str(text);
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;

    #[test]
    fn test_offsets_partition_text() {
        let tree = parse_fragment("<p>The <b>Tes</b>la<i></i> report</p>").unwrap();
        let flat = flatten(&tree);

        assert_eq!(flat.text, "The Tesla report");
        let texts: Vec<_> = flat.leaves.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["The ", "Tes", "la", " report"]);

        let mut cursor = 0;
        for leaf in &flat.leaves {
            assert_eq!(leaf.start, cursor);
            assert_eq!(&flat.text[leaf.span().to_range()], leaf.text);
            cursor = leaf.end();
        }
        assert_eq!(cursor, flat.len());
    }

    #[test]
    fn test_empty_leaves_take_no_space() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.append_text(root, "ab").unwrap();
        tree.append_text(root, "").unwrap();
        tree.append_text(root, "cd").unwrap();

        let flat = flatten(&tree);
        assert_eq!(flat.leaves.len(), 3);
        assert_eq!(flat.leaves[1].span(), ByteSpan { start: 2, end: 2 });
        assert_eq!(flat.leaves[2].start, 2);
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::new();
        let flat = flatten(&tree);
        assert!(flat.is_empty());
        assert!(flat.leaves.is_empty());
    }
}
