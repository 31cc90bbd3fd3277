//! Viewer session: the state behind one search panel.
//!
//! Holds the pristine document, the current query, the latest highlighted
//! rendition, and the navigator. Every change of document or query re-runs
//! the pipeline in one call, so callers never see a half-updated state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dom::{to_html, Tree};
use crate::error::{Error, Result};
use crate::pipeline::{self, Highlighted};
use crate::tools::{
    FetchFence, FetchTicket, Match, MatchOpts, Navigator, ScrollPort, ScrollTarget,
};
use crate::{LoadOutcome, NavState, SearchOutcome};

#[derive(Debug, Default)]
pub struct ViewerSession {
    opts: MatchOpts,
    fence: FetchFence,
    document: Option<Arc<Tree>>,
    query: String,
    view: Option<Highlighted>,
    nav: Navigator,
    open: bool,
}

impl ViewerSession {
    pub fn new(opts: MatchOpts) -> Self {
        Self {
            opts,
            ..Self::default()
        }
    }

    #[inline]
    pub fn opts(&self) -> &MatchOpts {
        &self.opts
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the panel is showing a document.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn document(&self) -> Option<&Arc<Tree>> {
        self.document.as_ref()
    }

    /// Current matches; empty when nothing has been searched.
    pub fn matches(&self) -> &[Match] {
        self.view.as_ref().map_or(&[], |v| v.matches.as_slice())
    }

    #[inline]
    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// Snapshot for the counter and the navigation controls.
    pub fn nav_state(&self) -> NavState {
        NavState {
            match_count: self.nav.len(),
            current: self.nav.current(),
            counter: self.nav.counter(),
            can_navigate: self.nav.can_navigate(),
        }
    }

    /// Markup of the highlighted document, if one is loaded.
    pub fn render(&self) -> Option<String> {
        match (&self.view, &self.document) {
            (Some(view), _) => Some(to_html(&view.tree)),
            (None, Some(doc)) => Some(to_html(doc)),
            (None, None) => None,
        }
    }

    // -------- Loading --------

    /// Start a fetch. Only the payload carrying the newest ticket is applied.
    ///
    /// Returns `None` without fetching while the query is too short.
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        if !self.opts.accepts(&self.query) {
            debug!(query_len = self.query.chars().count(), "query too short; not fetching");
            return None;
        }
        Some(self.fence.issue())
    }

    /// Apply a fetched payload if `ticket` is still current.
    ///
    /// On success the panel opens and the query is highlighted, scrolling to
    /// the first match. If the query has become too short since the fetch
    /// began, the payload is dropped and the panel stays as it was.
    pub fn apply_fetched(
        &mut self,
        ticket: FetchTicket,
        raw: &[u8],
        port: &mut dyn ScrollPort,
    ) -> Result<LoadOutcome> {
        if !self.opts.accepts(&self.query) {
            return Ok(LoadOutcome::TooShort);
        }
        if !self.fence.is_current(ticket) {
            debug!(
                ticket = ticket.get(),
                latest = self.fence.latest().map(FetchTicket::get),
                "discarding stale payload"
            );
            return Ok(LoadOutcome::Stale);
        }

        let document = Arc::new(pipeline::load(raw)?);
        let nodes = document.len();
        self.document = Some(document);
        self.view = None;
        self.nav.reset(0);
        self.open = true;
        self.refresh(port)?;

        Ok(LoadOutcome::Loaded {
            nodes,
            match_count: self.nav.len(),
        })
    }

    /// Hide the panel. The document stays cached until the next load.
    pub fn close(&mut self) {
        self.open = false;
    }

    // -------- Searching --------

    /// Set the query and, when the panel is open, re-highlight.
    ///
    /// Too-short queries are ignored and leave the current highlights alone.
    pub fn search(&mut self, query: &str, port: &mut dyn ScrollPort) -> Result<SearchOutcome> {
        self.query = query.to_string();
        if !self.opts.accepts(query) {
            return Ok(SearchOutcome::TooShort);
        }
        if !self.open || self.document.is_none() {
            return Ok(SearchOutcome::Pending);
        }
        self.refresh(port)?;
        Ok(SearchOutcome::Searched {
            match_count: self.nav.len(),
        })
    }

    /// Re-run the pipeline for the stored query over the loaded document.
    fn refresh(&mut self, port: &mut dyn ScrollPort) -> Result<()> {
        let document = self.document.as_ref().ok_or(Error::NoDocument)?;
        let view = pipeline::recompute(document, &self.query, &self.opts)?;
        self.nav.reset(view.matches.len());
        self.view = Some(view);

        if self.nav.current().is_some() {
            self.scroll_current(port);
        }
        Ok(())
    }

    // -------- Navigation --------

    /// Advance to the next match and scroll to it.
    pub fn next(&mut self, port: &mut dyn ScrollPort) -> Option<usize> {
        let current = self.nav.next()?;
        self.scroll(current, port);
        Some(current)
    }

    /// Step back to the previous match and scroll to it.
    pub fn prev(&mut self, port: &mut dyn ScrollPort) -> Option<usize> {
        let current = self.nav.prev()?;
        self.scroll(current, port);
        Some(current)
    }

    /// Select match `index` and scroll to it.
    pub fn scroll_to(&mut self, index: usize, port: &mut dyn ScrollPort) -> Result<()> {
        let len = self.nav.len();
        if index >= len {
            return Err(Error::MatchOutOfBounds(index, len));
        }
        self.nav.select(index);
        self.scroll(index, port);
        Ok(())
    }

    /// Re-issue the scroll for the selected match, if any.
    pub fn scroll_current(&mut self, port: &mut dyn ScrollPort) {
        if let Some(current) = self.nav.current() {
            self.scroll(current, port);
        }
    }

    fn scroll(&self, index: usize, port: &mut dyn ScrollPort) {
        let target = ScrollTarget {
            match_index: index,
            segment: self.matches().get(index).and_then(|m| m.anchor()),
        };
        if let Err(err) = port.scroll_into_view(target) {
            warn!(match_index = index, error = %err, "scroll request failed");
        }
    }
}
