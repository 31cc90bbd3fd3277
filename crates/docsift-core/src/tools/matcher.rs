use crate::error::Result;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher as GrepMatcher, RegexMatcherBuilder};

/// Shortest query the locator will run.
pub const MIN_QUERY_LEN: usize = 3;

/// Options for literal query matching.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchOpts {
    /// Case-insensitive ("i")
    pub case_insensitive: bool,
    /// Unicode-aware case folding
    pub unicode: bool,
    /// Queries with fewer chars than this are not searched
    pub min_query_len: usize,
}

impl Default for MatchOpts {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            unicode: true,
            min_query_len: MIN_QUERY_LEN,
        }
    }
}

impl MatchOpts {
    /// True if `query` is long enough to search.
    #[inline]
    pub fn accepts(&self, query: &str) -> bool {
        !query.is_empty() && query.chars().count() >= self.min_query_len
    }
}

/// Thin wrapper around `grep_regex::RegexMatcher`.
pub struct RegexMatcher {
    inner: GrepMatcher,
}

impl RegexMatcher {
    /// Compile `query` as a literal: every regex metacharacter is escaped.
    pub fn literal(query: &str, opts: &MatchOpts) -> Result<Self> {
        Self::compile(&regex::escape(query), opts)
    }

    /// Compile a regex pattern into a matcher.
    pub fn compile(pattern: &str, opts: &MatchOpts) -> Result<Self> {
        let mut b = RegexMatcherBuilder::new();
        b.case_insensitive(opts.case_insensitive)
            .unicode(opts.unicode)
            .multi_line(false)
            .dot_matches_new_line(false);

        let matcher = b.build(pattern)?;
        Ok(Self { inner: matcher })
    }

    /// Enumerate non-overlapping matches within `region` (relative offsets).
    ///
    /// Calls `on_match((start, end))` for each occurrence. Return `false`
    /// from the closure to stop early.
    pub fn find_in_region(
        &self,
        region: &[u8],
        mut on_match: impl FnMut((usize, usize)) -> bool,
    ) -> Result<()> {
        self.inner
            .find_iter(region, |m| on_match((m.start(), m.end())))?;
        Ok(())
    }
}
