//! Cyclic navigation over a match list, plus the scroll port it drives.

use thiserror::Error;

use crate::dom::NodeId;

/// Where the presentation layer should scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollTarget {
    pub match_index: usize,
    /// First highlight node of the match, if it was spliced.
    pub segment: Option<NodeId>,
}

/// Why a scroll request was not carried out. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrollError {
    #[error("highlight for match {0} is not attached")]
    Detached(usize),

    #[error("scroll surface unavailable: {0}")]
    Unavailable(String),
}

/// Presentation-side hook that brings a highlight into view, centered.
pub trait ScrollPort {
    fn scroll_into_view(&mut self, target: ScrollTarget) -> Result<(), ScrollError>;
}

/// A port that ignores every request; for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScroll;

impl ScrollPort for NoScroll {
    fn scroll_into_view(&mut self, _: ScrollTarget) -> Result<(), ScrollError> {
        Ok(())
    }
}

/// Cursor over `len` matches.
///
/// Invariant: `current` is `Some(i)` with `i < len`, or `None` exactly when
/// `len == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Navigator {
    len: usize,
    current: Option<usize>,
}

impl Navigator {
    /// Navigator positioned on the first of `len` matches, if any.
    pub fn new(len: usize) -> Self {
        let mut nav = Self::default();
        nav.reset(len);
        nav
    }

    /// Start over for a fresh match list.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.current = (len > 0).then_some(0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Whether next/prev controls should be enabled.
    #[inline]
    pub fn can_navigate(&self) -> bool {
        self.len > 0
    }

    /// Advance cyclically; no-op when empty.
    pub fn next(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let i = self.current.map_or(0, |i| (i + 1) % self.len);
        self.current = Some(i);
        self.current
    }

    /// Step back cyclically; no-op when empty.
    pub fn prev(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let i = self.current.map_or(self.len - 1, |i| (i + self.len - 1) % self.len);
        self.current = Some(i);
        self.current
    }

    /// Jump to `index` if it is in range.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index < self.len {
            self.current = Some(index);
        }
        self.current
    }

    /// Counter text: `"<current+1> / <len>"`, or `"0 / 0"` when empty.
    pub fn counter(&self) -> String {
        match self.current {
            Some(i) if self.len > 0 => format!("{} / {}", i + 1, self.len),
            _ => "0 / 0".to_string(),
        }
    }
}
