// src/data.rs
//
// Canonical run data.
//
// - CategorySource: one configured listing page (key + url).
// - Item / CategoryOutcome: what a category resolved to, tagged with the
//   fallback tier that produced it.
// - RunRecord: the immutable result of one invocation. This is also the exact
//   shape persisted to `products.json` and read back by the next run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySource {
    pub key: String,
    pub url: String,
}

impl CategorySource {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self { key: key.into(), url: url.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub rank: u32,
    pub identifier: String,
    pub title: String,
    pub url: String,
}

/// Which tier of the fallback chain produced a category's items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Fresh,
    ReusePrevious,
    Seed,
    Empty,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Fresh => "fresh",
            Status::ReusePrevious => "reuse_previous",
            Status::Seed => "seed",
            Status::Empty => "empty",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub key: String,
    pub count: usize,
    pub status: Status,
    pub items: Vec<Item>,
}

impl CategoryOutcome {
    /// Keeps `count` in lockstep with `items`; the only way outcomes are built.
    pub fn new(key: impl Into<String>, status: Status, items: Vec<Item>) -> Self {
        Self { key: key.into(), count: items.len(), status, items }
    }

    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, Status::Empty, Vec::new())
    }

    /// `count == items.len()` and ranks run densely `1..=count`.
    pub fn is_consistent(&self) -> bool {
        self.count == self.items.len()
            && self.items.iter().enumerate().all(|(i, it)| it.rank as usize == i + 1)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|it| it.identifier.as_str())
    }
}

/// Acquisition strategy of a deployment. Never mixed within one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Scrape every category, degrade to previous run, then seed list.
    #[default]
    Live,
    /// Seed list only; no network traffic towards the listing source.
    Curated,
}

impl SourceMode {
    pub fn label(&self) -> &'static str {
        match self {
            SourceMode::Live => "live scrape with previous/seed fallback",
            SourceMode::Curated => "curated seed list",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    pub totals: usize,
    pub results: Vec<CategoryOutcome>,
}

impl RunRecord {
    pub fn outcome(&self, key: &str) -> Option<&CategoryOutcome> {
        self.results.iter().find(|o| o.key == key)
    }

    /// Structural check applied to records read back from disk.
    pub fn is_consistent(&self) -> bool {
        self.results.iter().all(CategoryOutcome::is_consistent)
            && self.totals == self.results.iter().map(|o| o.count).sum::<usize>()
    }

    pub fn all_identifiers(&self) -> Vec<&str> {
        self.results.iter().flat_map(|o| o.identifiers()).collect()
    }
}
