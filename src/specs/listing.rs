// src/specs/listing.rs
//! Reading spec for best-seller listing pages.
//!
//! The direct page is HTML; the reader mirror returns Markdown. Both carry the
//! product links, so extraction keys off the link path alone:
//! `/dp/<10 alphanumerics>`. Markup around the link is only consulted for a
//! display title, and that lookup is allowed to fail.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::html::{attr_value, inner_until_ci, open_tag_around, strip_tags};
use crate::core::sanitize::{normalize_entities, normalize_ws, strip_image_label};

const ID_LEN: usize = 10;

// Take the whole alphanumeric run; only a run of exactly ten is an identifier.
// `_` and other punctuation end the run.
static PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/dp/([A-Za-z0-9]+)").expect("static product path pattern")
});

/// `(offset of "/dp/", identifier)` for each well-formed product link.
fn product_links(text: &str) -> impl Iterator<Item = (usize, &str)> {
    PRODUCT_PATH.captures_iter(text).filter_map(|c| {
        let whole = c.get(0)?;
        let id = c.get(1)?;
        (id.len() == ID_LEN).then_some((whole.start(), id.as_str()))
    })
}

/// Distinct identifiers in first-seen order, at most `limit`.
///
/// Scanning stops after `limit * 2` raw matches so a page full of repeated
/// links cannot make this unbounded. Zero matches is a normal result.
pub fn extract(text: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (_, raw) in product_links(text).take(limit.saturating_mul(2)) {
        let id = raw.to_ascii_uppercase();
        if seen.insert(id.clone()) {
            out.push(id);
        }
    }
    out.truncate(limit);
    out
}

/// Placeholder used when no title can be found near the link.
pub fn placeholder_title(identifier: &str) -> String {
    format!("ASIN {identifier}")
}

/// Best-effort display title for `identifier`, looked up around its first link.
pub fn title_for(text: &str, identifier: &str) -> Option<String> {
    let (pos, _) = product_links(text).find(|(_, id)| id.eq_ignore_ascii_case(identifier))?;

    markdown_label(text, pos).or_else(|| anchor_title(text, pos))
}

/// `[label](https://…/dp/ID…)`, including `[![Image 1: alt](img)](…)`.
fn markdown_label(text: &str, pos: usize) -> Option<String> {
    let head = &text[..pos];
    let line = &head[head.rfind('\n').map_or(0, |i| i + 1)..];
    let close = line.rfind("](")?;
    // the link target has to run unbroken up to the product path
    if line[close + 2..].contains([' ', ')', '(']) {
        return None;
    }
    let label = bracket_label(&line[..close])?.trim();
    let label = match label.strip_prefix("![") {
        Some(img) => strip_image_label(&img[..img.find(']')?]),
        None => label,
    };
    non_empty(normalize_ws(&normalize_entities(label)))
}

/// Text after the `[` that opens the bracket closing at the end of `s`.
fn bracket_label(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, ch) in s.char_indices().rev() {
        match ch {
            ']' => depth += 1,
            '[' if depth == 0 => return Some(&s[i + 1..]),
            '[' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// `<a title="…">`, else the anchor's text, else an `<img alt="…">` inside it.
fn anchor_title(text: &str, pos: usize) -> Option<String> {
    let (start, end) = open_tag_around(text, pos, "a")?;
    if let Some(t) = attr_value(&text[start..end], "title").and_then(non_empty) {
        return Some(t);
    }
    let inner = inner_until_ci(text, end, "</a>")?;
    if let Some(t) = non_empty(strip_tags(inner)) {
        return Some(t);
    }
    let img_at = inner.to_ascii_lowercase().find("<img")?;
    let img_end = inner[img_at..].find('>').map_or(inner.len(), |e| img_at + e + 1);
    attr_value(&inner[img_at..img_end], "alt").and_then(non_empty)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
