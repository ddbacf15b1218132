// src/core/html.rs
//
// Tolerant, case-insensitive markup helpers. No DOM; just local scanning
// around known positions. ASCII lowercasing keeps byte offsets aligned with
// the original text, so indices found in the lowered copy are valid in both.

use super::sanitize::{normalize_entities, normalize_ws};

/// Byte range `[start, end)` of the `<tag ...>` opener that encloses `pos`.
pub fn open_tag_around(doc: &str, pos: usize, tag: &str) -> Option<(usize, usize)> {
    let head = doc.get(..pos)?;
    let lc = head.to_ascii_lowercase();
    let needle = format!("<{}", tag.to_ascii_lowercase());

    let mut search_end = lc.len();
    let start = loop {
        let s = lc[..search_end].rfind(&needle)?;
        // `<a` must not match `<abbr`, `<area`, ...
        let next = lc.as_bytes().get(s + needle.len()).copied();
        if matches!(next, Some(b' ' | b'\t' | b'\n' | b'\r')) {
            break s;
        }
        search_end = s;
    };
    // opener must still be open at `pos`
    if head[start..].contains('>') {
        return None;
    }
    let end = doc[pos..].find('>')? + pos + 1;
    Some((start, end))
}

/// Value of attribute `name` in an opener like `<a href="..." title='...'>`.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = open_tag.to_ascii_lowercase();
    let key = format!("{}=", name.to_ascii_lowercase());
    let bytes = lc.as_bytes();

    let mut from = 0;
    while let Some(rel) = lc[from..].find(&key) {
        let at = from + rel;
        from = at + key.len();
        // must be a whole attribute name
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let rest = &open_tag[at + key.len()..];
        let value = match rest.chars().next()? {
            q @ ('"' | '\'') => {
                let body = &rest[1..];
                &body[..body.find(q)?]
            }
            _ => {
                let end = rest.find(|c: char| c.is_whitespace() || c == '>').unwrap_or(rest.len());
                &rest[..end]
            }
        };
        return Some(normalize_ws(&normalize_entities(value)));
    }
    None
}

/// Text between `from` and the next `close` (case-insensitive), if any.
pub fn inner_until_ci<'a>(doc: &'a str, from: usize, close: &str) -> Option<&'a str> {
    let tail = doc.get(from..)?;
    let end = tail.to_ascii_lowercase().find(&close.to_ascii_lowercase())?;
    Some(&tail[..end])
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
