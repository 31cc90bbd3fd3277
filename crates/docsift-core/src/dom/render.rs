//! Serialize a `Tree` back to markup for the viewer panel.

use std::fmt::Write as _;

use v_htmlescape::escape;

use crate::dom::parse::is_void;
use crate::dom::tree::{NodeId, NodeKind, Tree};

/// Class carried by every highlight `<span>`.
pub const HIGHLIGHT_CLASS: &str = "highlighted-text";

/// Attribute holding a highlight's match index; scroll targets are looked up
/// by it.
pub const MATCH_ATTR: &str = "data-sift-match";

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Render everything below the root as markup.
///
/// Text is escaped; attribute values are written back as they were read,
/// double-quoted; `script`/`style` content is written verbatim.
pub fn to_html(tree: &Tree) -> String {
    let mut out = String::new();
    let Some(root) = tree.get(tree.root()) else {
        return out;
    };

    let mut stack: Vec<Step> = root.children().iter().rev().map(|&c| Step::Open(c)).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let Some(node) = tree.get(id) else { continue };
                match node.kind() {
                    NodeKind::Element { name, attrs } => {
                        out.push('<');
                        out.push_str(name);
                        for attr in attrs {
                            out.push(' ');
                            out.push_str(&attr.name);
                            out.push_str("=\"");
                            push_attr_value(&mut out, &attr.raw_value);
                            out.push('"');
                        }
                        out.push('>');
                        if !is_void(name) {
                            stack.push(Step::Close(id));
                            stack.extend(node.children().iter().rev().map(|&c| Step::Open(c)));
                        }
                    }
                    NodeKind::Text(text) => {
                        // Writing to a String cannot fail.
                        let _ = write!(out, "{}", escape(text));
                    }
                    NodeKind::RawText(text) => out.push_str(text),
                    NodeKind::Highlight { match_index, text } => {
                        let _ = write!(
                            out,
                            "<span class=\"{HIGHLIGHT_CLASS}\" {MATCH_ATTR}=\"{match_index}\">{}</span>",
                            escape(text)
                        );
                    }
                }
            }
            Step::Close(id) => {
                if let Some(name) = tree.get(id).and_then(|n| n.name()) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }

    out
}

/// A value read from single quotes may hold `"`.
fn push_attr_value(out: &mut String, raw: &str) {
    let mut rest = raw;
    while let Some(at) = rest.find('"') {
        out.push_str(&rest[..at]);
        out.push_str("&quot;");
        rest = &rest[at + 1..];
    }
    out.push_str(rest);
}
