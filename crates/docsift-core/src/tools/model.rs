//! model.rs: spans and matches shared by the locator, splicer, and navigator

use std::ops::Range;

use crate::dom::NodeId;

/// `[start, end)` in bytes of the flattened text. Never inverted.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    #[inline]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The part of `self` inside `leaf`, relative to `leaf.start`.
    /// Empty when they are disjoint.
    #[must_use]
    pub fn clip_local(self, leaf: &ByteSpan) -> ByteSpan {
        let start = self.start.clamp(leaf.start, leaf.end) - leaf.start;
        let end = self.end.clamp(leaf.start, leaf.end) - leaf.start;
        ByteSpan {
            start,
            end: end.max(start),
        }
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.into()
    }
}

impl From<ByteSpan> for Range<usize> {
    fn from(span: ByteSpan) -> Self {
        span.start..span.end
    }
}

/// One occurrence of the query in the flattened text.
///
/// - `span` is the exact matched bytes.
/// - `segments` is empty until the match is spliced; afterwards it lists the
///   highlight nodes (in the spliced tree) that together cover `span`, in
///   document order. A match crossing a leaf boundary has one per leaf.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Match {
    pub span: ByteSpan,
    pub segments: Vec<NodeId>,
}

impl Match {
    #[inline]
    pub fn new(span: ByteSpan) -> Self {
        Self {
            span,
            segments: Vec::new(),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// The segment to scroll to: the first highlight of this match.
    #[inline]
    pub fn anchor(&self) -> Option<NodeId> {
        self.segments.first().copied()
    }
}

/// Ordered, non-overlapping matches; order is navigation order.
pub type MatchList = Vec<Match>;
