//! Document layer: the arena tree, the lenient markup parser that builds it,
//! and the renderer that turns it back into markup. Pure and IO-free; the
//! payload is already resident in memory.

pub mod parse;
pub mod render;
pub mod tree;

pub use parse::{parse_document, parse_fragment};
pub use render::{to_html, HIGHLIGHT_CLASS, MATCH_ATTR};
pub use tree::{Attribute, Node, NodeId, NodeKind, Tree};
