pub mod dom;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod tools;

pub use dom::{parse_document, to_html, NodeId, NodeKind, Tree};
pub use error::{Error, Result};
pub use pipeline::{load, recompute, Highlighted};
pub use session::ViewerSession;
pub use tools::{
    flatten, locate, sanitize, splice, ByteSpan, FetchFence, FetchTicket, Flattened, Match,
    MatchList, MatchOpts, Navigator, NoScroll, ScrollError, ScrollPort, ScrollTarget, Spliced,
    TextLeaf, MIN_QUERY_LEN,
};

/// Result of handing a fetched payload to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadOutcome {
    /// The payload was parsed and is now the displayed document.
    #[serde(rename_all = "camelCase")]
    Loaded { nodes: usize, match_count: usize },
    /// A newer fetch was started after this one; the payload was dropped.
    Stale,
    /// The query is too short to search; the panel stays closed.
    TooShort,
}

/// Result of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SearchOutcome {
    /// Query shorter than the minimum; nothing changed.
    TooShort,
    /// Query stored; it runs once a document is loaded and open.
    Pending,
    /// Highlights rebuilt.
    #[serde(rename_all = "camelCase")]
    Searched { match_count: usize },
}

/// Navigation snapshot for the counter and the next/prev controls.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavState {
    pub match_count: usize,
    /// Zero-based selection; `None` when there are no matches.
    pub current: Option<usize>,
    /// `"<current+1> / <count>"`, or `"0 / 0"`.
    pub counter: String,
    pub can_navigate: bool,
}

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        load, recompute, to_html, ByteSpan, Error, FetchTicket, Highlighted, LoadOutcome, Match,
        MatchList, MatchOpts, NavState, Navigator, NoScroll, Result, ScrollError, ScrollPort,
        ScrollTarget, SearchOutcome, Tree, ViewerSession,
    };
}
