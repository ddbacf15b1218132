// src/scrape/resolve.rs
//
// Per-category fallback chain. Tiers are tried in strict order until one
// commits:
//
//   1. fresh           live fetch + extract, accepted at >= min_accept ids
//   2. reuse_previous  previous run's items for the key, copied verbatim
//   3. seed            curated identifiers from the seed file
//   4. empty           zero items, key still reported
//
// Categories never influence each other, and nothing here can fail the run.

use tracing::{info, warn};

use crate::config::Config;
use crate::core::link::item_url;
use crate::core::net::{Fetcher, Transport};
use crate::core::pace;
use crate::data::{CategoryOutcome, CategorySource, Item, RunRecord, SourceMode, Status};
use crate::progress::Progress;
use crate::specs::listing;
use crate::store::Seeds;

pub struct Resolver<'a, T> {
    config: &'a Config,
    fetcher: &'a Fetcher<T>,
    previous: Option<&'a RunRecord>,
    seeds: &'a Seeds,
}

impl<'a, T: Transport> Resolver<'a, T> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a Fetcher<T>,
        previous: Option<&'a RunRecord>,
        seeds: &'a Seeds,
    ) -> Self {
        Self { config, fetcher, previous, seeds }
    }

    /// Resolve every configured category, in configuration order.
    pub fn resolve_all(&self, progress: &mut dyn Progress) -> Vec<CategoryOutcome> {
        let sources = &self.config.scrape.sources;
        progress.begin(sources.len());

        let live = self.config.scrape.mode == SourceMode::Live;
        let mut outcomes = Vec::with_capacity(sources.len());
        for (i, src) in sources.iter().enumerate() {
            if live && i > 0 {
                pace::pause(self.config.net.delay_between_categories_ms);
            }
            progress.log(&format!("Resolving {}…", src.key));

            let outcome = self.resolve(src);
            info!(key = %outcome.key, status = %outcome.status, count = outcome.count, "category resolved");
            progress.item_done(&outcome.key, outcome.status, outcome.count);
            outcomes.push(outcome);
        }

        progress.finish();
        outcomes
    }

    pub fn resolve(&self, src: &CategorySource) -> CategoryOutcome {
        let fresh = match self.config.scrape.mode {
            SourceMode::Live => self.try_fresh(src),
            SourceMode::Curated => None,
        };
        fresh
            .or_else(|| self.try_previous(&src.key))
            .or_else(|| self.try_seed(&src.key))
            .unwrap_or_else(|| {
                warn!(key = %src.key, "no live, previous or seed data");
                CategoryOutcome::empty(&src.key)
            })
    }

    /// Acceptance never drops below one id, so an empty page is never `fresh`.
    fn min_accept(&self) -> usize {
        self.config.scrape.min_accept.max(1)
    }

    fn try_fresh(&self, src: &CategorySource) -> Option<CategoryOutcome> {
        let text = match self.fetcher.fetch(&src.url) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = %src.key, error = %e, "fetch failed, falling back");
                return None;
            }
        };

        let ids = listing::extract(&text, self.config.scrape.limit);
        if ids.len() < self.min_accept() {
            warn!(
                key = %src.key,
                found = ids.len(),
                min_accept = self.min_accept(),
                "too few identifiers, falling back"
            );
            return None;
        }

        let items = self.build_items(&ids, |id| listing::title_for(&text, id));
        Some(CategoryOutcome::new(&src.key, Status::Fresh, items))
    }

    fn try_previous(&self, key: &str) -> Option<CategoryOutcome> {
        let prev = self.previous?.outcome(key)?;
        if prev.count < self.min_accept() {
            return None;
        }
        let items: Vec<Item> = prev.items.iter().take(self.config.scrape.limit).cloned().collect();
        Some(CategoryOutcome::new(key, Status::ReusePrevious, items))
    }

    fn try_seed(&self, key: &str) -> Option<CategoryOutcome> {
        let ids = self.seeds.get(key).filter(|ids| !ids.is_empty())?;
        let ids = &ids[..ids.len().min(self.config.scrape.limit)];
        let items = self.build_items(ids, |_| None);
        Some(CategoryOutcome::new(key, Status::Seed, items))
    }

    /// Ranks 1..N in the given order.
    fn build_items<F>(&self, ids: &[String], title_of: F) -> Vec<Item>
    where
        F: Fn(&str) -> Option<String>,
    {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Item {
                rank: (i + 1) as u32,
                identifier: id.clone(),
                title: title_of(id).unwrap_or_else(|| listing::placeholder_title(id)),
                url: item_url(&self.config.links, id),
            })
            .collect()
    }
}
