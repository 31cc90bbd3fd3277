//! WASM bindings for the docsift viewer.

use wasm_bindgen::prelude::*;

mod bindings;
mod globals;
mod orchestrator;
mod scroll;
mod utils;

pub use bindings::*;

#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

#[wasm_bindgen]
pub fn ping() -> String {
    "pong".to_string()
}

/// Render into the element with id `container_id` instead of the default.
#[wasm_bindgen]
pub fn init_viewer(container_id: String) {
    init();
    let id = container_id.trim();
    if id.is_empty() {
        globals::set_container_id(globals::DEFAULT_CONTAINER_ID);
    } else {
        globals::set_container_id(id);
    }
}
