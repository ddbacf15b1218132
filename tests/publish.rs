// tests/publish.rs
use std::fs;

use chrono::{TimeZone, Utc};

use shelfscan::config::options::{LinkOptions, OutputOptions};
use shelfscan::data::{CategoryOutcome, Item, SourceMode, Status};
use shelfscan::file;
use shelfscan::scrape::aggregate_at;

fn item(rank: u32, id: &str) -> Item {
    Item {
        rank,
        identifier: id.to_string(),
        title: format!("Title [{id}]"),
        url: format!("https://www.amazon.com/dp/{id}?tag=shop-20"),
    }
}

#[test]
fn writes_links_redirects_and_go_pages() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputOptions {
        data_dir: dir.path().join("data"),
        site_dir: dir.path().join("site"),
        ..OutputOptions::default()
    };
    let links = LinkOptions { public_base_url: "https://deals.example".into(), ..LinkOptions::default() };

    let run = aggregate_at(
        vec![
            CategoryOutcome::new("Home & Kitchen", Status::Fresh, vec![item(1, "B000000001"), item(2, "B000000002")]),
            CategoryOutcome::new("toys", Status::Seed, vec![item(1, "B000000001")]),
            CategoryOutcome::empty("beauty"),
        ],
        &[],
        SourceMode::Live,
        Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap(),
    );

    let written = file::publish(&run, &output, &links).unwrap();
    for p in &written {
        assert!(p.exists(), "{} missing", p.display());
    }

    let md = fs::read_to_string(output.links_file()).unwrap();
    assert!(md.starts_with("# Links (2026-03-01T06:00:00.000Z)"));
    assert!(md.contains("## Home & Kitchen (fresh)"));
    assert!(md.contains(r"1. [Title \[B000000001\]](https://www.amazon.com/dp/B000000001?tag=shop-20)"));
    assert!(md.contains("## beauty (empty)\n_no items_"));

    // one redirect per distinct identifier
    let redirect = fs::read_to_string(output.site_dir.join("r/B000000001/index.html")).unwrap();
    assert!(redirect.contains(r#"url=https://www.amazon.com/dp/B000000001?tag=shop-20""#));
    assert!(output.site_dir.join("r/B000000002/index.html").exists());

    let go_all = fs::read_to_string(output.site_dir.join("go/index.html")).unwrap();
    assert!(go_all.contains(r#"const ids = ["B000000001","B000000002"];"#));
    assert!(go_all.contains(r#""https://deals.example/r/""#));

    assert!(output.site_dir.join("go/home-kitchen/index.html").exists());
    assert!(output.site_dir.join("go/toys/index.html").exists());
    assert!(!output.site_dir.join("go/beauty").exists());

    // links.md + 2 redirects + go/ + 2 category pages
    assert_eq!(written.len(), 6);
}
