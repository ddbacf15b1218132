// src/runner.rs
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    config::Config,
    core::net::{Fetcher, Transport},
    data::RunRecord,
    error::{RunError, SetupError},
    file,
    notify::{self, Notifier},
    progress::{NullProgress, Progress},
    scrape::{self, Resolver},
    store,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Resolve and notify, but write nothing to disk.
    pub dry_run: bool,
}

/// Summary of what was produced.
pub struct RunSummary {
    pub record: RunRecord,
    pub files_written: Vec<PathBuf>,
}

/// One complete run across all configured categories.
///
/// Setup problems abort before any category is touched. After that, per-category
/// trouble is absorbed by the fallback chain; only failing to persist the record
/// makes the run fail.
pub fn run<T: Transport>(
    config: &Config,
    transport: T,
    notifier: &dyn Notifier,
    opts: RunOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    config.validate()?;
    if !opts.dry_run {
        let dir = &config.output.data_dir;
        fs::create_dir_all(dir).map_err(|source| SetupError::OutputDir { path: dir.clone(), source })?;
    }

    let run_file = config.output.run_file();
    let previous = store::load_previous(&run_file);
    let seeds = store::load_seeds(&config.output.seed_file);
    info!(
        mode = ?config.scrape.mode,
        categories = config.scrape.sources.len(),
        has_previous = previous.is_some(),
        seeded = seeds.len(),
        "starting run"
    );

    let fetcher = Fetcher::new(transport, config.net.clone());
    let resolver = Resolver::new(config, &fetcher, previous.as_ref(), &seeds);
    let mut silent = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut silent,
    };
    let outcomes = resolver.resolve_all(progress);
    let record = scrape::aggregate(outcomes, &config.scrape.category_order, config.scrape.mode);

    let mut files_written = Vec::new();
    if opts.dry_run {
        info!("dry run, nothing written");
    } else {
        store::save_run(&run_file, &record)?;
        files_written.push(run_file);

        if config.output.publish {
            match file::publish(&record, &config.output, &config.links) {
                Ok(paths) => files_written.extend(paths),
                Err(e) => warn!(error = %e, "publishing static outputs failed"),
            }
        }
    }

    notify::deliver(notifier, &notify::render_summary(&record));
    info!(totals = record.totals, "run complete");
    Ok(RunSummary { record, files_written })
}
