//! Scroll port backed by the browser DOM.

use docsift_core::dom::MATCH_ATTR;
use docsift_core::{ScrollError, ScrollPort, ScrollTarget};
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// CSS selector for the highlights of match `index`.
pub fn match_selector(index: usize) -> String {
    format!("[{MATCH_ATTR}=\"{index}\"]")
}

/// Smooth-scrolls a match's first highlight to the middle of the viewport.
pub struct DomScrollPort {
    container_id: String,
}

impl DomScrollPort {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }
}

impl ScrollPort for DomScrollPort {
    fn scroll_into_view(&mut self, target: ScrollTarget) -> Result<(), ScrollError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ScrollError::Unavailable("no document".to_string()))?;

        let selector = match_selector(target.match_index);
        let found = if self.container_id.is_empty() {
            document.query_selector(&selector)
        } else {
            let container = document
                .get_element_by_id(&self.container_id)
                .ok_or_else(|| {
                    ScrollError::Unavailable(format!("container #{} not found", self.container_id))
                })?;
            container.query_selector(&selector)
        };
        let element = found
            .map_err(|e| ScrollError::Unavailable(format!("{e:?}")))?
            .ok_or(ScrollError::Detached(target.match_index))?;

        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_selector_names_no_container() {
        assert_eq!(match_selector(4), "[data-sift-match=\"4\"]");
        assert_eq!(match_selector(0), "[data-sift-match=\"0\"]");
    }
}
