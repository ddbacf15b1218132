// src/file.rs
//
// Static outputs rendered from a finished RunRecord:
//   <data_dir>/links.md              Markdown link list per category
//   <site_dir>/r/<id>/index.html     redirect to the (tagged) product url
//   <site_dir>/go/index.html         random pick across all categories
//   <site_dir>/go/<slug>/index.html  random pick within one category

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::SecondsFormat;
use tracing::{debug, info, warn};

use crate::config::consts::GO_PICK_CAP;
use crate::config::options::{LinkOptions, OutputOptions};
use crate::core::html::escape;
use crate::core::sanitize::slug;
use crate::data::{Item, RunRecord};

/// Write every static output. Returns the paths written, in write order.
pub fn publish(run: &RunRecord, output: &OutputOptions, links: &LinkOptions) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let md = output.links_file();
    write_text(&md, &render_links_md(run))?;
    written.push(md);

    let mut seen = HashSet::new();
    for item in run.results.iter().flat_map(|o| o.items.iter()) {
        if !is_path_safe(&item.identifier) {
            debug!(identifier = %item.identifier, "skipping redirect for unsafe identifier");
            continue;
        }
        if seen.insert(item.identifier.as_str()) {
            written.push(write_redirect_page(&output.site_dir, item)?);
        }
    }

    let go_dir = output.site_dir.join("go");
    let mut distinct = HashSet::new();
    let all: Vec<&str> = run
        .all_identifiers()
        .into_iter()
        .filter(|id| is_path_safe(id) && distinct.insert(*id))
        .take(GO_PICK_CAP)
        .collect();
    if !all.is_empty() {
        let path = go_dir.join("index.html");
        write_text(&path, &render_go_page("Go", &all, &links.public_base_url))?;
        written.push(path);
    }
    let mut taken = HashSet::new();
    for outcome in &run.results {
        let ids: Vec<&str> = outcome.identifiers().filter(|id| is_path_safe(id)).collect();
        if ids.is_empty() {
            continue;
        }
        let name = unique_slug(&outcome.key, &mut taken);
        let path = go_dir.join(&name).join("index.html");
        write_text(&path, &render_go_page(&name, &ids, &links.public_base_url))?;
        written.push(path);
    }

    info!(files = written.len(), "published static outputs");
    Ok(written)
}

pub fn render_links_md(run: &RunRecord) -> String {
    let mut lines = vec![format!("# Links ({})", run.ts.to_rfc3339_opts(SecondsFormat::Millis, true)), String::new()];
    for o in &run.results {
        lines.push(format!("## {} ({})", o.key, o.status));
        if o.items.is_empty() {
            lines.push("_no items_".to_string());
        }
        for it in &o.items {
            lines.push(format!("{}. [{}]({})", it.rank, md_escape(&it.title), it.url));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn render_redirect_page(url: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta http-equiv="refresh" content="0; url={attr}">
<link rel="canonical" href="{attr}">
<title>Redirecting…</title>
<script>location.href={js};</script>
</head>
<body><a href="{attr}">Continue</a></body>
</html>
"#,
        attr = escape(url),
        js = js_literal(url),
    )
}

pub fn render_go_page(title: &str, ids: &[&str], public_base_url: &str) -> String {
    let target = format!("{}/r/", public_base_url.trim_end_matches('/'));
    format!(
        r#"<!doctype html>
<html><head><meta charset="utf-8"><title>{title}</title></head>
<body>
<script>
const ids = {ids};
const pick = ids[Math.floor(Math.random() * ids.length)];
location.href = {target} + pick + "/";
</script>
</body></html>
"#,
        title = escape(title),
        ids = js_literal(ids),
        target = js_literal(&target),
    )
}

fn write_redirect_page(site_dir: &Path, item: &Item) -> io::Result<PathBuf> {
    let path = site_dir.join("r").join(&item.identifier).join("index.html");
    write_text(&path, &render_redirect_page(&item.url))?;
    Ok(path)
}

fn write_text(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)
}

/// Slug for `key`, suffixed `-2`, `-3`… when an earlier key already took it.
fn unique_slug(key: &str, taken: &mut HashSet<String>) -> String {
    let base = slug(key);
    let mut name = base.clone();
    let mut n = 1;
    while taken.contains(&name) {
        n += 1;
        name = format!("{base}-{n}");
    }
    if n > 1 {
        warn!(key, slug = %name, "category slug collides with an earlier key");
    }
    taken.insert(name.clone());
    name
}

/// Identifiers become directory names; only plain alphanumerics qualify.
fn is_path_safe(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// JSON literal that is also safe inside a `<script>` element.
fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn md_escape(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_literal_cannot_close_script() {
        assert_eq!(js_literal("a</script>"), r#""a<\/script>""#);
        assert_eq!(js_literal(&["A1", "B2"][..]), r#"["A1","B2"]"#);
    }

    #[test]
    fn redirect_page_escapes_attribute() {
        let page = render_redirect_page("https://x.example/dp/A?tag=t&x=\"1\"");
        assert!(page.contains(r#"url=https://x.example/dp/A?tag=t&amp;x=&quot;1&quot;""#));
        assert!(page.contains(r#"location.href="https://x.example/dp/A?tag=t&x=\"1\"";"#));
    }

    #[test]
    fn go_page_joins_base_url() {
        let page = render_go_page("toys", &["B000000001"], "https://site.example/");
        assert!(page.contains(r#"location.href = "https://site.example/r/" + pick + "/";"#));
        assert!(page.contains(r#"const ids = ["B000000001"];"#));
    }

    #[test]
    fn colliding_slugs_get_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(unique_slug("home_garden", &mut taken), "home-garden");
        assert_eq!(unique_slug("home-garden", &mut taken), "home-garden-2");
        assert_eq!(unique_slug("Home Garden", &mut taken), "home-garden-3");
        assert_eq!(unique_slug("toys", &mut taken), "toys");
    }

    #[test]
    fn unsafe_identifiers_are_rejected() {
        assert!(is_path_safe("B000000001"));
        assert!(!is_path_safe("../etc"));
        assert!(!is_path_safe(""));
    }
}
