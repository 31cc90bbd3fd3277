//! Match locator: literal, case-insensitive, non-overlapping scan.

use tracing::debug;

use crate::error::Result;
use crate::tools::matcher::{MatchOpts, RegexMatcher};
use crate::tools::model::{ByteSpan, Match, MatchList};

/// Find every occurrence of `query` in `text`, left to right.
///
/// A query shorter than `opts.min_query_len` yields an empty list; that is a
/// policy, not a failure. Matches never overlap: after a hit the scan resumes
/// at its end.
pub fn locate(text: &str, query: &str, opts: &MatchOpts) -> Result<MatchList> {
    if !opts.accepts(query) {
        debug!(query_len = query.chars().count(), "query too short; skipping scan");
        return Ok(MatchList::new());
    }

    let matcher = RegexMatcher::literal(query, opts)?;
    let mut matches = MatchList::new();
    matcher.find_in_region(text.as_bytes(), |(start, end)| {
        // Zero-width hits are dropped.
        if end > start {
            matches.push(Match::new(ByteSpan { start, end }));
        }
        true
    })?;

    debug!(matches = matches.len(), text_len = text.len(), "located matches");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(matches: &MatchList) -> Vec<usize> {
        matches.iter().map(Match::start).collect()
    }

    #[test]
    fn test_case_insensitive_occurrences() {
        let text = "The Tesla report mentions Tesla twice";
        let matches = locate(text, "tesla", &MatchOpts::default()).unwrap();
        assert_eq!(starts(&matches), vec![4, 26]);
        assert!(matches.iter().all(|m| m.len() == 5));
        assert!(matches.iter().all(|m| m.segments.is_empty()));
    }

    #[test]
    fn test_short_query_is_a_no_op() {
        let matches = locate("abababab", "ab", &MatchOpts::default()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_overlapping_candidates_keep_leftmost() {
        let matches = locate("aaaaa", "aaa", &MatchOpts::default()).unwrap();
        assert_eq!(starts(&matches), vec![0]);

        let matches = locate("abcabcabc", "cab", &MatchOpts::default()).unwrap();
        assert_eq!(starts(&matches), vec![2, 5]);
    }

    #[test]
    fn test_special_characters_are_literal() {
        let text = "cost: $1.00 (approx) or $1x00";
        let matches = locate(text, "$1.00 (", &MatchOpts::default()).unwrap();
        assert_eq!(starts(&matches), vec![6]);
    }

    #[test]
    fn test_offsets_are_bytes_on_char_boundaries() {
        let text = "über Über ÜBER";
        let matches = locate(text, "über", &MatchOpts::default()).unwrap();
        assert_eq!(matches.len(), 3);
        for m in &matches {
            assert!(text.is_char_boundary(m.span.start));
            assert!(text.is_char_boundary(m.span.end));
            assert_eq!(text[m.span.to_range()].to_lowercase(), "über");
        }
    }

    #[test]
    fn test_no_matches() {
        let matches = locate("nothing here", "tesla", &MatchOpts::default()).unwrap();
        assert!(matches.is_empty());
    }
}
