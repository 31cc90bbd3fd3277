//! Orchestrator for coordinating the viewer session with the page.
//!
//! The session is driven with a no-op scroll port while it rebuilds
//! highlights; the markup is written into the container first and the
//! scroll is issued afterwards, once the highlight elements exist.

use docsift_core::prelude::*;
use parking_lot::Mutex;
use serde::Serialize;

use crate::globals::{container_id, get_session};
use crate::scroll::DomScrollPort;

/// What the page needs after any state change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub status: &'static str,
    pub open: bool,
    pub query: String,
    /// Highlighted markup; `None` when nothing is loaded.
    pub html: Option<String>,
    pub nav: NavState,
}

/// Coordinates operations using global state.
pub struct Orchestrator {
    session: &'static Mutex<ViewerSession>,
    container_id: String,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            session: get_session(),
            container_id: container_id(),
        }
    }

    fn port(&self) -> DomScrollPort {
        DomScrollPort::new(self.container_id.clone())
    }

    /// `None` while the query is too short to search.
    pub fn begin_load(&self) -> Option<FetchTicket> {
        self.session.lock().begin_fetch()
    }

    pub fn finish_load(&self, ticket: FetchTicket, raw: &[u8]) -> Result<ViewSnapshot> {
        let mut session = self.session.lock();
        let outcome = session.apply_fetched(ticket, raw, &mut NoScroll)?;
        let status = match outcome {
            LoadOutcome::Stale => return Ok(self.snapshot_of(&session, "stale", false)),
            LoadOutcome::TooShort => return Ok(self.snapshot_of(&session, "tooShort", false)),
            LoadOutcome::Loaded { .. } => "loaded",
        };
        let snapshot = self.snapshot_of(&session, status, true);
        session.scroll_current(&mut self.port());
        Ok(snapshot)
    }

    pub fn close(&self) {
        self.session.lock().close();
    }

    pub fn search(&self, query: &str) -> Result<ViewSnapshot> {
        let mut session = self.session.lock();
        let (status, changed) = match session.search(query, &mut NoScroll)? {
            SearchOutcome::TooShort => ("tooShort", false),
            SearchOutcome::Pending => ("pending", false),
            SearchOutcome::Searched { .. } => ("searched", true),
        };
        let snapshot = self.snapshot_of(&session, status, changed);
        if changed {
            session.scroll_current(&mut self.port());
        }
        Ok(snapshot)
    }

    pub fn next(&self) -> Option<usize> {
        self.session.lock().next(&mut self.port())
    }

    pub fn prev(&self) -> Option<usize> {
        self.session.lock().prev(&mut self.port())
    }

    pub fn scroll_to(&self, index: usize) -> Result<()> {
        self.session.lock().scroll_to(index, &mut self.port())
    }

    pub fn scroll_current(&self) {
        self.session.lock().scroll_current(&mut self.port());
    }

    pub fn nav_state(&self) -> NavState {
        self.session.lock().nav_state()
    }

    pub fn is_open(&self) -> bool {
        self.session.lock().is_open()
    }

    /// Build a snapshot; with `mount`, also write the markup into the container.
    fn snapshot_of(&self, session: &ViewerSession, status: &'static str, mount: bool) -> ViewSnapshot {
        let html = session.render();
        if mount {
            if let Some(markup) = html.as_deref() {
                self.mount(markup);
            }
        }
        ViewSnapshot {
            status,
            open: session.is_open(),
            query: session.query().to_string(),
            html,
            nav: session.nav_state(),
        }
    }

    fn mount(&self, markup: &str) {
        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.container_id));
        match container {
            Some(element) => element.set_inner_html(markup),
            None => web_sys::console::warn_1(
                &format!("docsift: container #{} not found", self.container_id).into(),
            ),
        }
    }
}
