use docsift_core::{load, recompute, to_html, MatchOpts};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::js_err;
use crate::orchestrator::Orchestrator;
use crate::utils::{to_js, JsObjectBuilder};

/// Set the search query and re-highlight the open document.
#[wasm_bindgen]
pub fn search(query: String) -> Result<JsValue, JsValue> {
    let snapshot = Orchestrator::new()
        .search(&query)
        .map_err(|e| js_err!("Search failed: {}", e))?;
    to_js(&snapshot)
}

/// Highlight `query` in standalone markup without touching the session.
#[wasm_bindgen]
pub fn highlight_markup(markup: String, query: String) -> Result<JsValue, JsValue> {
    let document = load(markup.as_bytes()).map_err(|e| js_err!("Failed to parse markup: {}", e))?;
    let highlighted = recompute(&Arc::new(document), &query, &MatchOpts::default())
        .map_err(|e| js_err!("Search failed: {}", e))?;

    let obj = JsObjectBuilder::new()
        .set("html", JsValue::from_str(&to_html(&highlighted.tree)))?
        .set("matchCount", JsValue::from(highlighted.matches.len() as u32))?
        .build();

    Ok(obj)
}
