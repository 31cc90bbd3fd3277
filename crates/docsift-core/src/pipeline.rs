//! The search pipeline, run synchronously end to end.
//!
//! `load` turns a fetched payload into a pristine document tree once;
//! `recompute` derives a highlighted tree from it for each query. Nothing is
//! updated incrementally, and a partially built result is never observable.

use std::sync::Arc;

use tracing::debug;

use crate::dom::{parse_document, Tree};
use crate::error::Result;
use crate::tools::{flatten, locate, sanitize, splice, MatchList, MatchOpts};

/// A highlighted rendition of a document.
#[derive(Clone, Debug)]
pub struct Highlighted {
    /// The spliced tree, or the pristine document itself when nothing matched.
    pub tree: Arc<Tree>,
    pub matches: MatchList,
}

impl Highlighted {
    /// The document as-is, nothing highlighted.
    pub fn plain(document: &Arc<Tree>) -> Self {
        Self {
            tree: Arc::clone(document),
            matches: MatchList::new(),
        }
    }
}

/// Sanitize and parse a raw payload into a document tree.
pub fn load(raw: &[u8]) -> Result<Tree> {
    let markup = sanitize(raw);
    let tree = parse_document(&markup)?;
    debug!(bytes = raw.len(), nodes = tree.len(), "parsed document");
    Ok(tree)
}

/// Flatten, locate, and splice `query` over `document`.
///
/// A query too short to search, or one with no hits, returns the document
/// unchanged without running the splicer.
pub fn recompute(document: &Arc<Tree>, query: &str, opts: &MatchOpts) -> Result<Highlighted> {
    if !opts.accepts(query) {
        return Ok(Highlighted::plain(document));
    }

    let flat = flatten(document);
    let matches = locate(&flat.text, query, opts)?;
    if matches.is_empty() {
        debug!(text_len = flat.len(), "no matches");
        return Ok(Highlighted::plain(document));
    }

    let spliced = splice(document, &flat, matches)?;
    Ok(Highlighted {
        tree: Arc::new(spliced.tree),
        matches: spliced.matches,
    })
}
