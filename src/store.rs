// src/store.rs
//
// On-disk state between runs:
// - the run record (`data/products.json`), written atomically and read back
//   once at the start of the next run;
// - the curated seed list (`config/asin_lists.json`), read-only.
//
// Readers never fail the run. Anything missing or malformed reads as "no data".

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::RunRecord;
use crate::error::StoreError;

/// Category key → curated identifiers, in display order.
pub type Seeds = HashMap<String, Vec<String>>;

/// Previous run, or `None` when absent or structurally invalid.
pub fn load_previous(path: &Path) -> Option<RunRecord> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no previous run");
            return None;
        }
    };
    let run: RunRecord = match serde_json::from_str(&text) {
        Ok(r) => r,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "previous run unreadable, ignoring");
            return None;
        }
    };
    if !run.is_consistent() {
        warn!(path = %path.display(), "previous run has inconsistent counts or ranks, ignoring");
        return None;
    }
    info!(path = %path.display(), ts = %run.ts, totals = run.totals, "loaded previous run");
    Some(run)
}

/// Write `run` next to `path` and rename it into place.
pub fn save_run(path: &Path, run: &RunRecord) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io(parent))?;
        }
    }

    let json = serde_json::to_string_pretty(run)?;
    let tmp = tmp_path(path);
    {
        let mut file = fs::File::create(&tmp).map_err(io(&tmp))?;
        file.write_all(json.as_bytes()).map_err(io(&tmp))?;
        file.write_all(b"\n").map_err(io(&tmp))?;
        file.sync_all().map_err(io(&tmp))?;
    }
    fs::rename(&tmp, path).map_err(io(path))?;
    info!(path = %path.display(), totals = run.totals, "run record saved");
    Ok(())
}

fn io(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Seed list from disk; missing or malformed file yields no seeds.
pub fn load_seeds(path: &Path) -> Seeds {
    match fs::read_to_string(path) {
        Ok(text) => parse_seeds(&text).unwrap_or_else(|| {
            warn!(path = %path.display(), "seed file is not a JSON object of lists, ignoring");
            Seeds::new()
        }),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no seed file");
            Seeds::new()
        }
    }
}

/// `{ "key": ["ID", ...], ... }`. Non-string and blank entries are dropped,
/// identifiers are trimmed, upper-cased and deduplicated keeping first.
pub fn parse_seeds(text: &str) -> Option<Seeds> {
    let Value::Object(map) = serde_json::from_str::<Value>(text).ok()? else {
        return None;
    };

    let mut seeds = Seeds::new();
    for (key, value) in map {
        let Value::Array(list) = value else {
            warn!(key = %key, "seed entry is not a list, skipping");
            continue;
        };
        let mut seen = HashSet::new();
        let ids: Vec<String> = list
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        seeds.insert(key, ids);
    }
    Some(seeds)
}
