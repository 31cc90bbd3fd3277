use thiserror::Error;

use crate::dom::NodeId;

/// Canonical errors for docsift core
#[derive(Error, Debug)]
pub enum Error {
    // -------- Document / Tree --------
    #[error("no document loaded")]
    NoDocument,

    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is a text leaf, not an element")]
    NotAnElement(NodeId),

    #[error("markup error at byte {position}: {source}")]
    Markup {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    // -------- Locate / Splice / Navigate --------
    #[error("invalid range: [{0}, {1})")]
    InvalidRange(usize, usize),

    #[error("match index {0} out of bounds ({1} matches)")]
    MatchOutOfBounds(usize, usize),

    #[error("byte range [{0}, {1}) does not fall on character boundaries")]
    SliceBoundary(usize, usize),

    // -------- Wrapped sources --------
    #[error(transparent)]
    Grep(#[from] grep_regex::Error),

    #[error(transparent)]
    GrepMatcher(#[from] grep_matcher::NoError),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
