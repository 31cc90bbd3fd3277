//! Payload sanitizer: decode bytes and flatten non-breaking spaces.
//!
//! Filings pad table cells and headings with `&nbsp;`; queries are typed
//! with ordinary spaces.

use std::borrow::Cow;

use memchr::memchr;

const NBSP: char = '\u{a0}';

/// Entity spellings of U+00A0, matched case-insensitively.
const NBSP_ENTITIES: &[&str] = &["&nbsp;", "&#160;", "&#xa0;"];

/// Decode `raw` as UTF-8 (lossy) and replace every non-breaking space,
/// literal or entity, with `' '`.
pub fn sanitize(raw: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(raw);
    normalize_spaces(&decoded).into_owned()
}

/// Replace literal and entity non-breaking spaces in `text` with `' '`.
pub fn normalize_spaces(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    if memchr(b'&', bytes).is_none() && !text.contains(NBSP) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == NBSP {
            out.push(' ');
            rest = &rest[c.len_utf8()..];
            continue;
        }
        if c == '&' {
            if let Some(entity) = NBSP_ENTITIES.iter().find(|e| starts_with_ignore_case(rest, e)) {
                out.push(' ');
                rest = &rest[entity.len()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

#[inline]
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_entity_and_literal_nbsp() {
        let raw = "Total&nbsp;revenues&#160;and\u{a0}costs&#xA0;(in&NBSP;millions)";
        assert_eq!(
            sanitize(raw.as_bytes()),
            "Total revenues and costs (in millions)"
        );
    }

    #[test]
    fn test_other_entities_untouched() {
        assert_eq!(normalize_spaces("R&amp;D &lt;b&gt;"), "R&amp;D &lt;b&gt;");
        assert_eq!(normalize_spaces("&nbsp"), "&nbsp");
    }

    #[test]
    fn test_borrows_when_clean() {
        assert!(matches!(normalize_spaces("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let raw = b"ok \xff ok";
        assert_eq!(sanitize(raw), "ok \u{fffd} ok");
    }
}
