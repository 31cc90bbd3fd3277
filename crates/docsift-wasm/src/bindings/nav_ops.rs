//! Match navigation. Every call scrolls the selected match into view.

use wasm_bindgen::prelude::*;

use crate::js_err;
use crate::orchestrator::Orchestrator;
use crate::utils::to_js;

/// Advance to the next match, wrapping to the first. Returns the new
/// zero-based index, or `undefined` when there are no matches.
#[wasm_bindgen]
pub fn next_match() -> Option<u32> {
    Orchestrator::new().next().map(|i| i as u32)
}

/// Step back to the previous match, wrapping to the last.
#[wasm_bindgen]
pub fn prev_match() -> Option<u32> {
    Orchestrator::new().prev().map(|i| i as u32)
}

#[wasm_bindgen]
pub fn scroll_to_match(index: u32) -> Result<(), JsValue> {
    Orchestrator::new()
        .scroll_to(index as usize)
        .map_err(|e| js_err!("{}", e))
}

/// Re-issue the scroll for the selected match, e.g. after the panel opens.
#[wasm_bindgen]
pub fn scroll_to_current() {
    Orchestrator::new().scroll_current();
}

/// Counter text such as `"2 / 5"`.
#[wasm_bindgen]
pub fn match_counter() -> String {
    Orchestrator::new().nav_state().counter
}

#[wasm_bindgen]
pub fn navigation_state() -> Result<JsValue, JsValue> {
    to_js(&Orchestrator::new().nav_state())
}
