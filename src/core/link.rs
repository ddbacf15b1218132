// src/core/link.rs
use reqwest::Url;

use crate::config::consts::AFFILIATE_PARAM;
use crate::config::options::LinkOptions;

/// Canonical product link for `identifier`, tagged when a tag is configured.
pub fn item_url(links: &LinkOptions, identifier: &str) -> String {
    let base = format!("{}{}", links.product_base_url, identifier);
    with_affiliate_tag(&base, links.affiliate_tag.as_deref())
}

/// Append `tag=<tag>` unless the url already carries a `tag` parameter.
/// Never overwrites, so applying it twice is a no-op.
pub fn with_affiliate_tag(url: &str, tag: Option<&str>) -> String {
    let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
        return url.to_string();
    };
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.query_pairs().any(|(k, _)| k == AFFILIATE_PARAM) {
        return url.to_string();
    }
    parsed.query_pairs_mut().append_pair(AFFILIATE_PARAM, tag);
    parsed.to_string()
}
