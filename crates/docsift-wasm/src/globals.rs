//! Global state management for the WASM module.
//!
//! These globals are initialized lazily on first access and persist
//! for the lifetime of the WASM instance.

use docsift_core::{MatchOpts, ViewerSession};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::cell::RefCell;

/// Element id of the panel the highlighted document is rendered into.
pub const DEFAULT_CONTAINER_ID: &str = "docsift-viewer";

thread_local! {
    static CONTAINER_ID: RefCell<String> = RefCell::new(DEFAULT_CONTAINER_ID.to_string());
}

/// Global viewer session; one search panel per page.
pub(crate) static SESSION: Lazy<Mutex<ViewerSession>> =
    Lazy::new(|| Mutex::new(ViewerSession::new(MatchOpts::default())));

/// Get a reference to the global viewer session.
pub fn get_session() -> &'static Mutex<ViewerSession> {
    &SESSION
}

/// Current container element id.
pub fn container_id() -> String {
    CONTAINER_ID.with(|id| id.borrow().clone())
}

/// Point rendering and scrolling at another container element.
pub fn set_container_id(id: &str) {
    CONTAINER_ID.with(|slot| *slot.borrow_mut() = id.to_string());
}
