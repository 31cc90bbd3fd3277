//! Lenient markup parsing into a `Tree`.
//!
//! Filings arrive as XHTML (inline XBRL), but hand-written HTML shows up
//! too, so the tokenizer runs with end-name checks off and the tree builder
//! repairs nesting itself:
//! - an end tag closes the nearest open element with the same name, and any
//!   elements opened after it;
//! - an end tag with no open counterpart is dropped;
//! - void elements (`br`, `img`, ...) never take children.
//!
//! Comments, declarations, processing instructions, and doctypes carry no
//! visible text and are dropped.
//!
//! Before tokenizing, a `<` that opens no tag is rewritten to `&lt;` and the
//! bodies of `script`/`style` are escaped, so both come back out of entity
//! resolution exactly as written.

use std::borrow::Cow;

use memchr::{memchr, memmem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::dom::tree::{Attribute, NodeId, NodeKind, Tree};
use crate::error::{Error, Result};

/// Elements that never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is not rendered as document content.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[inline]
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[inline]
pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Parse `markup` into a tree.
///
/// When a `<body>` element is present only its content is kept, mirroring what
/// a browser would place in the viewer panel.
pub fn parse_document(markup: &str) -> Result<Tree> {
    let tree = parse_fragment(markup)?;
    match tree.find_element("body") {
        Some(body) => {
            let mut out = Tree::new();
            let root = out.root();
            tree.graft_children(body, &mut out, root, |_, node, dst, parent| {
                dst.append(parent, node.kind().clone()).map(|_| ())
            })?;
            Ok(out)
        }
        None => Ok(tree),
    }
}

/// Parse `markup` into a tree without looking for `<body>`.
pub fn parse_fragment(markup: &str) -> Result<Tree> {
    let markup = protect_text(markup);
    let mut reader = Reader::from_str(&markup);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut tree = Tree::new();
    // Open elements, innermost last. The root is never popped.
    let mut open: Vec<(NodeId, String)> = vec![(tree.root(), String::new())];

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|source| Error::Markup { position, source })?;

        match event {
            Event::Start(ref e) => {
                let (name, attrs) = element_parts(e)?;
                let parent = current(&open);
                let void = is_void(&name);
                let id = tree.append_element(parent, name.clone(), attrs)?;
                if !void {
                    open.push((id, name));
                }
            }
            Event::Empty(ref e) => {
                let (name, attrs) = element_parts(e)?;
                tree.append_element(current(&open), name, attrs)?;
            }
            Event::End(ref e) => {
                let qname = e.name();
                let name = std::str::from_utf8(qname.as_ref())?;
                // Skip index 0: the synthetic root has an empty name.
                if let Some(pos) = open
                    .iter()
                    .skip(1)
                    .rposition(|(_, n)| n.eq_ignore_ascii_case(name))
                {
                    open.truncate(pos + 1);
                }
            }
            Event::Text(ref e) => {
                let raw = std::str::from_utf8(e)?;
                push_text(&mut tree, &open, resolve_entities(raw))?;
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let text = std::str::from_utf8(&raw)?;
                push_text(&mut tree, &open, Cow::Borrowed(text))?;
            }
            Event::Eof => break,
            // Comment, Decl, PI, DocType
            _ => {}
        }
    }

    Ok(tree)
}

enum Lt {
    /// Not markup; escaped as text.
    Stray,
    /// A tag, comment, or declaration of this many bytes.
    Skip(usize),
    /// A `script`/`style` start tag; its body is raw text.
    RawOpen { tag_len: usize, name_len: usize },
}

/// Escape everything the tokenizer would misread as markup.
fn protect_text(markup: &str) -> Cow<'_, str> {
    let bytes = markup.as_bytes();
    let mut out = String::new();
    // Bytes of `markup` already copied into `out`.
    let mut flushed = 0;
    let mut i = 0;

    while let Some(off) = memchr(b'<', &bytes[i..]) {
        let lt = i + off;
        match classify(&bytes[lt..]) {
            Lt::Stray => {
                out.push_str(&markup[flushed..lt]);
                out.push_str("&lt;");
                flushed = lt + 1;
                i = lt + 1;
            }
            Lt::Skip(len) => i = lt + len,
            Lt::RawOpen { tag_len, name_len } => {
                let body_start = lt + tag_len;
                let name = &bytes[lt + 1..lt + 1 + name_len];
                let body_end =
                    find_close(&bytes[body_start..], name).map_or(bytes.len(), |o| body_start + o);
                let body = &markup[body_start..body_end];
                if body.contains(['<', '&']) {
                    out.push_str(&markup[flushed..body_start]);
                    for c in body.chars() {
                        match c {
                            '&' => out.push_str("&amp;"),
                            '<' => out.push_str("&lt;"),
                            _ => out.push(c),
                        }
                    }
                    flushed = body_end;
                }
                // The end tag is picked up on the next pass.
                i = body_end;
            }
        }
    }

    if flushed == 0 {
        return Cow::Borrowed(markup);
    }
    out.push_str(&markup[flushed..]);
    Cow::Owned(out)
}

/// `rest` starts with `<`.
fn classify(rest: &[u8]) -> Lt {
    match rest.get(1) {
        Some(b'!') if rest.starts_with(b"<!--") => Lt::Skip(skip_past(rest, b"-->")),
        Some(b'!') if rest.starts_with(b"<![CDATA[") => Lt::Skip(skip_past(rest, b"]]>")),
        Some(b'!' | b'?') => Lt::Skip(skip_past(rest, b">")),
        Some(b'/') if rest.get(2).is_some_and(u8::is_ascii_alphabetic) => Lt::Skip(tag_len(rest)),
        Some(c) if c.is_ascii_alphabetic() => {
            let len = tag_len(rest);
            let name_len = rest[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'))
                .count();
            let name = &rest[1..1 + name_len];
            let self_closing = rest[..len].ends_with(b"/>");
            let raw = RAW_TEXT_ELEMENTS
                .iter()
                .any(|r| r.as_bytes().eq_ignore_ascii_case(name));
            if raw && !self_closing {
                Lt::RawOpen {
                    tag_len: len,
                    name_len,
                }
            } else {
                Lt::Skip(len)
            }
        }
        _ => Lt::Stray,
    }
}

fn skip_past(rest: &[u8], end: &[u8]) -> usize {
    memmem::find(rest, end).map_or(rest.len(), |o| o + end.len())
}

/// Length of the tag at the start of `rest`, up to and including `>`.
/// Quoted attribute values may contain `>`.
fn tag_len(rest: &[u8]) -> usize {
    let mut quote = None;
    for (i, &b) in rest.iter().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return i + 1,
            None => {}
        }
    }
    rest.len()
}

/// Offset of the `</name` that closes a raw text element.
fn find_close(body: &[u8], name: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(off) = memmem::find(&body[from..], b"</") {
        let at = from + off;
        let after = &body[at + 2..];
        if after.len() >= name.len()
            && after[..name.len()].eq_ignore_ascii_case(name)
            && after
                .get(name.len())
                .map_or(true, |b| !b.is_ascii_alphanumeric())
        {
            return Some(at);
        }
        from = at + 2;
    }
    None
}

#[inline]
fn current(open: &[(NodeId, String)]) -> NodeId {
    open.last().map_or(NodeId::ROOT, |(id, _)| *id)
}

fn push_text(tree: &mut Tree, open: &[(NodeId, String)], text: Cow<'_, str>) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let (parent, parent_name) = open
        .last()
        .map(|(id, name)| (*id, name.as_str()))
        .unwrap_or((NodeId::ROOT, ""));
    let kind = if is_raw_text(parent_name) {
        NodeKind::RawText(text.into_owned())
    } else {
        NodeKind::Text(text.into_owned())
    };
    tree.append(parent, kind)?;
    Ok(())
}

fn element_parts(e: &BytesStart<'_>) -> Result<(String, Vec<Attribute>)> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attrs = Vec::new();
    // Malformed attributes are skipped rather than failing the whole document.
    for attr in e.html_attributes().flatten() {
        attrs.push(Attribute {
            name: std::str::from_utf8(attr.key.as_ref())?.to_string(),
            raw_value: String::from_utf8_lossy(&attr.value).into_owned(),
        });
    }
    Ok((name, attrs))
}

/// Resolve character references in `raw`.
///
/// Handles decimal and hex numeric references, the XML predefined entities,
/// and the named HTML entities common in filings. Anything unrecognized is
/// left verbatim.
pub fn resolve_entities(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(raw);
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut i = first;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |off| i + off);
            out.push_str(&raw[i..next]);
            i = next;
            continue;
        }

        // Entity names are short; bound the lookahead.
        let window_end = (i + 34).min(bytes.len());
        let resolved = memchr(b';', &bytes[i + 1..window_end]).and_then(|off| {
            let end = i + 1 + off;
            decode_entity(&raw[i + 1..end]).map(|decoded| (decoded, end + 1))
        });

        match resolved {
            Some((decoded, next)) => {
                out.push(decoded);
                i = next;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bull" => '\u{2022}',
        "hellip" => '\u{2026}',
        "middot" => '\u{b7}',
        "sect" => '\u{a7}',
        "para" => '\u{b6}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "deg" => '\u{b0}',
        "plusmn" => '\u{b1}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        "cent" => '\u{a2}',
        "pound" => '\u{a3}',
        "euro" => '\u{20ac}',
        "yen" => '\u{a5}',
        "frac12" => '\u{bd}',
        "frac14" => '\u{bc}',
        "frac34" => '\u{be}',
        "dagger" => '\u{2020}',
        "Dagger" => '\u{2021}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn names(tree: &Tree) -> Vec<String> {
        tree.descendants(tree.root())
            .filter_map(|id| tree.get(id).and_then(Node::name).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_keeps_body_content_only() {
        let tree = parse_document(
            "<html><head><title>Ignored</title></head><body><p>Hello <b>world</b></p></body></html>",
        )
        .unwrap();
        assert_eq!(tree.text_content(tree.root()), "Hello world");
        assert_eq!(names(&tree), vec!["#document", "p", "b"]);
    }

    #[test]
    fn test_fragment_without_body() {
        let tree = parse_document("<div>a<span>b</span>c</div>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "abc");
    }

    #[test]
    fn test_repairs_unclosed_and_void_elements() {
        let tree = parse_fragment("<div><p>one<br>two</div><p>three</p>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "onetwothree");

        let root = tree.node(tree.root()).unwrap();
        // `</div>` closed the dangling `<p>` as well.
        assert_eq!(root.children().len(), 2);
        let br = tree.find_element("br").unwrap();
        assert!(tree.node(br).unwrap().children().is_empty());
    }

    #[test]
    fn test_stray_end_tag_is_dropped() {
        let tree = parse_fragment("<p>a</span>b</p>").unwrap();
        let p = tree.find_element("p").unwrap();
        assert_eq!(tree.text_content(p), "ab");
    }

    #[test]
    fn test_entities_and_cdata() {
        let tree =
            parse_fragment("<p>R&amp;D &#8212; &#x41;&copy; &bogus; 5 &lt; 6<![CDATA[<raw>]]></p>")
                .unwrap();
        assert_eq!(
            tree.text_content(tree.root()),
            "R&D \u{2014} A\u{a9} &bogus; 5 < 6<raw>"
        );
    }

    #[test]
    fn test_attributes_are_kept_raw() {
        let tree = parse_fragment(r#"<span style="font-weight:bold" title="a &amp; b">x</span>"#)
            .unwrap();
        let span = tree.find_element("span").unwrap();
        let NodeKind::Element { attrs, .. } = tree.node(span).unwrap().kind() else {
            panic!("span is an element");
        };
        assert_eq!(attrs[0].name, "style");
        assert_eq!(attrs[0].raw_value, "font-weight:bold");
        assert_eq!(attrs[1].raw_value, "a &amp; b");
    }

    #[test]
    fn test_style_text_is_not_content() {
        let tree = parse_fragment("<style>p > b { color: red }</style><p>shown</p>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "shown");
    }

    #[test]
    fn test_comments_are_dropped() {
        let tree = parse_fragment("<p>a<!-- hidden -->b</p>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "ab");
    }

    #[test]
    fn test_bare_less_than_is_text() {
        let tree = parse_document("<p>5 < 6 tesla</p>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "5 < 6 tesla");
        assert_eq!(names(&tree), vec!["#document", "p"]);

        let tree = parse_fragment("<p>a <3 b</ c</p>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "a <3 b</ c");
    }

    #[test]
    fn test_script_body_is_kept_verbatim() {
        let src = "<script>if (a<b && c) { x() }</script><p>tesla</p>";
        let tree = parse_fragment(src).unwrap();
        assert_eq!(names(&tree), vec!["#document", "script", "p"]);
        assert_eq!(tree.text_content(tree.root()), "tesla");

        let script = tree.find_element("script").unwrap();
        let body = tree.node(script).unwrap().children()[0];
        assert_eq!(
            tree.node(body).unwrap().kind(),
            &NodeKind::RawText("if (a<b && c) { x() }".to_string())
        );
    }

    #[test]
    fn test_lt_inside_attributes_and_cdata() {
        let tree = parse_fragment(r#"<p title="1 < 2">x<![CDATA[a < b]]></p>"#).unwrap();
        assert_eq!(tree.text_content(tree.root()), "xa < b");
        let p = tree.find_element("p").unwrap();
        let NodeKind::Element { attrs, .. } = tree.node(p).unwrap().kind() else {
            panic!("p is an element");
        };
        assert_eq!(attrs[0].raw_value, "1 < 2");
    }

    #[test]
    fn test_protect_text_borrows_clean_markup() {
        assert!(matches!(protect_text("<p>a</p><!-- x < y -->"), Cow::Borrowed(_)));
        assert_eq!(protect_text("<style>a<b</STYLE>"), "<style>a&lt;b</STYLE>");
    }

    #[test]
    fn test_resolve_entities_borrows_when_untouched() {
        assert!(matches!(resolve_entities("plain text"), Cow::Borrowed(_)));
        assert_eq!(resolve_entities("a&b"), "a&b");
        assert_eq!(resolve_entities("&nbsp;x"), "\u{a0}x");
    }
}
