//! Document loading: fetch tickets, payload hand-off, and panel state.

use docsift_core::FetchTicket;
use wasm_bindgen::prelude::*;

use crate::js_err;
use crate::orchestrator::Orchestrator;
use crate::utils::{ticket_from_js, to_js};

/// Start a document fetch and return its ticket, or `undefined` when the
/// query is too short and nothing should be fetched.
///
/// Pass the ticket back to `finish_document_load` with the response body;
/// a response whose ticket has been superseded is dropped.
#[wasm_bindgen]
pub fn begin_document_load() -> Option<f64> {
    Orchestrator::new()
        .begin_load()
        .map(|ticket| ticket.get() as f64)
}

/// Hand a fetched payload to the viewer.
///
/// Returns a snapshot with `status` set to `"loaded"`, `"stale"`, or
/// `"tooShort"`.
#[wasm_bindgen]
pub fn finish_document_load(ticket: f64, payload: js_sys::Uint8Array) -> Result<JsValue, JsValue> {
    let ticket = FetchTicket::from_raw(ticket_from_js(ticket)?);
    let raw = payload.to_vec();
    let snapshot = Orchestrator::new()
        .finish_load(ticket, &raw)
        .map_err(|e| js_err!("Failed to load document: {}", e))?;
    to_js(&snapshot)
}

/// Record a failed fetch. The panel stays as it was.
#[wasm_bindgen]
pub fn report_load_failure(message: String) {
    web_sys::console::error_1(&format!("Error fetching XML data: {message}").into());
}

#[wasm_bindgen]
pub fn close_document() {
    Orchestrator::new().close();
}

#[wasm_bindgen]
pub fn is_document_open() -> bool {
    Orchestrator::new().is_open()
}
