//! Node splicer: rebuild a tree with every match wrapped in highlight nodes.
//!
//! The source tree is never mutated. Each text leaf overlapping a match is
//! replaced, in place, by a run of plain and highlight leaves whose
//! concatenated text equals the original leaf text; every other node is
//! copied unchanged. Leftover highlights from an earlier pass are demoted to
//! plain text, so splicing an already spliced tree renders the same markup.
//!
//! A match may cross any number of leaf boundaries. The match cursor is
//! carried across leaves and only advances once a match's end has been
//! consumed.

use std::collections::HashMap;

use tracing::debug;

use crate::dom::{NodeId, NodeKind, Tree};
use crate::error::{Error, Result};
use crate::tools::flatten::Flattened;
use crate::tools::model::MatchList;

/// Output of [`splice`]: the new tree and the matches, each now carrying the
/// ids of its highlight nodes in that tree.
#[derive(Clone, Debug)]
pub struct Spliced {
    pub tree: Tree,
    pub matches: MatchList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment<'t> {
    Plain(&'t str),
    Highlight { match_index: usize, text: &'t str },
}

/// Rebuild `tree` with `matches` highlighted.
///
/// `flat` must be `flatten(tree)`. Matches must be sorted, non-overlapping,
/// and inside the flattened text; otherwise `InvalidRange` is returned.
pub fn splice(tree: &Tree, flat: &Flattened<'_>, mut matches: MatchList) -> Result<Spliced> {
    validate(flat, &matches)?;
    let plan = plan(flat, &matches)?;

    for m in &mut matches {
        m.segments.clear();
    }

    let mut out = Tree::new();
    let out_root = out.root();
    tree.graft_children(tree.root(), &mut out, out_root, |id, node, dst, parent| {
        let Some(segments) = plan.get(&id) else {
            let kind = match node.kind() {
                NodeKind::Highlight { text, .. } => NodeKind::Text(text.clone()),
                other => other.clone(),
            };
            dst.append(parent, kind)?;
            return Ok(());
        };

        for segment in segments {
            match *segment {
                Segment::Plain(text) => {
                    dst.append_text(parent, text)?;
                }
                Segment::Highlight { match_index, text } => {
                    let hl = dst.append(
                        parent,
                        NodeKind::Highlight {
                            match_index,
                            text: text.to_string(),
                        },
                    )?;
                    matches[match_index].segments.push(hl);
                }
            }
        }
        Ok(())
    })?;

    debug!(
        leaves_split = plan.len(),
        matches = matches.len(),
        nodes = out.len(),
        "spliced highlights"
    );
    Ok(Spliced { tree: out, matches })
}

fn validate(flat: &Flattened<'_>, matches: &MatchList) -> Result<()> {
    let mut prev_end = 0;
    for m in matches {
        let span = m.span;
        if span.start < prev_end || span.end < span.start || span.end > flat.len() {
            return Err(Error::InvalidRange(span.start, span.end));
        }
        prev_end = span.end;
    }
    Ok(())
}

/// Work out the replacement segments for every leaf a match touches.
fn plan<'t>(
    flat: &Flattened<'t>,
    matches: &MatchList,
) -> Result<HashMap<NodeId, Vec<Segment<'t>>>> {
    let mut plan = HashMap::new();
    let mut mi = 0;

    for leaf in &flat.leaves {
        let leaf_span = leaf.span();
        let mut segments = Vec::new();
        let mut cursor = 0;

        while let Some(m) = matches.get(mi) {
            if m.span.start >= leaf_span.end {
                break;
            }

            let local = m.span.clip_local(&leaf_span);
            if local.start > cursor {
                segments.push(Segment::Plain(slice(leaf.text, cursor, local.start)?));
            }
            if !local.is_empty() {
                segments.push(Segment::Highlight {
                    match_index: mi,
                    text: slice(leaf.text, local.start, local.end)?,
                });
            }
            cursor = cursor.max(local.end);

            // Continues into the next leaf.
            if m.span.end > leaf_span.end {
                break;
            }
            mi += 1;
        }

        if segments.is_empty() {
            continue;
        }
        if cursor < leaf.text.len() {
            segments.push(Segment::Plain(slice(leaf.text, cursor, leaf.text.len())?));
        }
        plan.insert(leaf.node, segments);
    }

    Ok(plan)
}

#[inline]
fn slice(text: &str, start: usize, end: usize) -> Result<&str> {
    text.get(start..end).ok_or(Error::SliceBoundary(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, to_html, Node};
    use crate::tools::flatten::flatten;
    use crate::tools::locate::locate;
    use crate::tools::matcher::MatchOpts;
    use crate::tools::model::{ByteSpan, Match};

    fn run(tree: &Tree, query: &str) -> Spliced {
        let flat = flatten(tree);
        let matches = locate(&flat.text, query, &MatchOpts::default()).unwrap();
        splice(tree, &flat, matches).unwrap()
    }

    /// Leaf texts of `parent`'s children, highlights marked with brackets.
    fn child_texts(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.node(parent)
            .unwrap()
            .children()
            .iter()
            .map(|&c| {
                let node = tree.node(c).unwrap();
                match node.kind() {
                    NodeKind::Highlight { text, .. } => format!("[{text}]"),
                    _ => node.text().unwrap_or_default().to_string(),
                }
            })
            .collect()
    }

    fn tree_of_leaves(leaves: &[&str]) -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        for leaf in leaves {
            tree.append_text(root, *leaf).unwrap();
        }
        tree
    }

    #[test]
    fn test_match_inside_single_leaf() {
        let tree = tree_of_leaves(&["The Tesla report"]);
        let out = run(&tree, "tesla");

        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["The ", "[Tesla]", " report"]
        );
        assert_eq!(out.matches[0].segments.len(), 1);
    }

    #[test]
    fn test_match_across_two_leaves() {
        let tree = tree_of_leaves(&["Te", "sla Inc"]);
        let out = run(&tree, "tesla");

        assert_eq!(out.matches.len(), 1);
        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["[Te]", "[sla]", " Inc"]
        );
        let m = &out.matches[0];
        assert_eq!(m.segments.len(), 2);
        let combined: String = m
            .segments
            .iter()
            .filter_map(|&id| out.tree.get(id).and_then(Node::text))
            .collect();
        assert_eq!(combined, "Tesla");
        assert_eq!(out.tree.text_content(out.tree.root()), "Tesla Inc");
    }

    #[test]
    fn test_match_across_many_leaves_and_elements() {
        let tree = parse_fragment("<p>x T<b>e</b><i></i><u>s</u>la, tesla!</p>").unwrap();
        let out = run(&tree, "tesla");

        assert_eq!(out.matches.len(), 2);
        assert_eq!(out.matches[0].segments.len(), 4);
        assert_eq!(out.matches[1].segments.len(), 1);
        assert_eq!(
            to_html(&out.tree),
            "<p>x <span class=\"highlighted-text\" data-sift-match=\"0\">T</span>\
             <b><span class=\"highlighted-text\" data-sift-match=\"0\">e</span></b><i></i>\
             <u><span class=\"highlighted-text\" data-sift-match=\"0\">s</span></u>\
             <span class=\"highlighted-text\" data-sift-match=\"0\">la</span>, \
             <span class=\"highlighted-text\" data-sift-match=\"1\">tesla</span>!</p>"
        );
    }

    #[test]
    fn test_several_matches_in_one_leaf() {
        let tree = tree_of_leaves(&["abc-abc-abc"]);
        let out = run(&tree, "ABC");
        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["[abc]", "-", "[abc]", "-", "[abc]"]
        );
    }

    #[test]
    fn test_match_ending_on_leaf_boundary() {
        let tree = tree_of_leaves(&["xxabc", "abcyy"]);
        let out = run(&tree, "abc");
        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["xx", "[abc]", "[abc]", "yy"]
        );
        assert_eq!(out.matches[0].segments.len(), 1);
        assert_eq!(out.matches[1].segments.len(), 1);
    }

    #[test]
    fn test_untouched_leaves_are_copied() {
        let tree = parse_fragment("<p>nothing</p><p>has tesla</p>").unwrap();
        let out = run(&tree, "tesla");
        let first_p = out.tree.node(out.tree.root()).unwrap().children()[0];
        assert_eq!(child_texts(&out.tree, first_p), vec!["nothing"]);
    }

    #[test]
    fn test_no_matches_preserves_tree() {
        let tree = parse_fragment("<p>a <b>b</b></p>").unwrap();
        let out = run(&tree, "zzz");
        assert!(out.matches.is_empty());
        assert_eq!(to_html(&out.tree), to_html(&tree));
        assert_eq!(out.tree.len(), tree.len());
    }

    #[test]
    fn test_resplicing_is_stable() {
        let tree = parse_fragment("<p>Te<b>sla</b> and tesla</p>").unwrap();
        let once = run(&tree, "tesla");
        let twice = run(&once.tree, "tesla");
        assert_eq!(to_html(&once.tree), to_html(&twice.tree));
    }

    #[test]
    fn test_stale_highlights_are_demoted() {
        let tree = parse_fragment("<p>alpha beta</p>").unwrap();
        let first = run(&tree, "alpha");
        let second = run(&first.tree, "beta");
        assert_eq!(
            to_html(&second.tree),
            "<p>alpha <span class=\"highlighted-text\" data-sift-match=\"0\">beta</span></p>"
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_and_unsorted() {
        let tree = tree_of_leaves(&["short"]);
        let flat = flatten(&tree);

        let past_end = vec![Match::new(ByteSpan { start: 3, end: 9 })];
        assert!(matches!(
            splice(&tree, &flat, past_end),
            Err(Error::InvalidRange(3, 9))
        ));

        let unsorted = vec![
            Match::new(ByteSpan { start: 2, end: 4 }),
            Match::new(ByteSpan { start: 0, end: 1 }),
        ];
        assert!(splice(&tree, &flat, unsorted).is_err());
    }

    #[test]
    fn test_empty_leaf_inside_cross_leaf_match() {
        let tree = tree_of_leaves(&["Te", "", "sla"]);
        let out = run(&tree, "tesla");

        assert_eq!(out.matches.len(), 1);
        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["[Te]", "", "[sla]"]
        );
        let combined: String = out.matches[0]
            .segments
            .iter()
            .filter_map(|&id| out.tree.get(id).and_then(Node::text))
            .collect();
        assert_eq!(combined, "Tesla");
    }

    #[test]
    fn test_match_splitting_a_character_is_rejected() {
        let tree = tree_of_leaves(&["\u{e4}bc"]);
        let flat = flatten(&tree);
        // Starts inside the two-byte 'ä'.
        let inside = vec![Match::new(ByteSpan { start: 1, end: 3 })];
        assert!(matches!(
            splice(&tree, &flat, inside),
            Err(Error::SliceBoundary(0, 1))
        ));
    }

    #[test]
    fn test_multibyte_match_across_leaves() {
        let tree = tree_of_leaves(&["Gr\u{fc}", "\u{df}e aus K\u{f6}ln"]);
        let out = run(&tree, "GR\u{dc}SSE");
        // Simple case folding only: 'ß' does not match "SS".
        assert!(out.matches.is_empty());

        let out = run(&tree, "gr\u{fc}\u{df}e");
        assert_eq!(out.matches.len(), 1);
        assert_eq!(
            child_texts(&out.tree, out.tree.root()),
            vec!["[Gr\u{fc}]", "[\u{df}e]", " aus K\u{f6}ln"]
        );
    }
}
