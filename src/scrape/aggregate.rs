// src/scrape/aggregate.rs
use chrono::{DateTime, SubsecRound, Utc};

use crate::data::{CategoryOutcome, RunRecord, SourceMode};

/// Preferred keys first, in preferred order; everything else after, in
/// encounter order. Absent preferred keys are skipped, repeated ones count once.
pub fn reorder(outcomes: Vec<CategoryOutcome>, preferred: &[String]) -> Vec<CategoryOutcome> {
    let mut slots: Vec<Option<CategoryOutcome>> = outcomes.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());

    for key in preferred {
        let hit = slots
            .iter_mut()
            .find(|slot| matches!(slot, Some(o) if o.key == *key));
        if let Some(slot) = hit {
            ordered.extend(slot.take());
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}

pub fn aggregate(outcomes: Vec<CategoryOutcome>, preferred: &[String], mode: SourceMode) -> RunRecord {
    aggregate_at(outcomes, preferred, mode, Utc::now().trunc_subsecs(3))
}

/// Same as [`aggregate`] with an explicit timestamp.
pub fn aggregate_at(
    outcomes: Vec<CategoryOutcome>,
    preferred: &[String],
    mode: SourceMode,
    ts: DateTime<Utc>,
) -> RunRecord {
    let results = reorder(outcomes, preferred);
    let totals = results.iter().map(|o| o.count).sum();
    RunRecord { ts, source: mode.label().to_string(), totals, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Item, Status};

    fn outcome(key: &str, n: usize) -> CategoryOutcome {
        let items = (1..=n)
            .map(|r| Item {
                rank: r as u32,
                identifier: format!("{key}{r:0>6}"),
                title: String::new(),
                url: String::new(),
            })
            .collect();
        CategoryOutcome::new(key, if n == 0 { Status::Empty } else { Status::Seed }, items)
    }

    fn keys(v: &[CategoryOutcome]) -> Vec<&str> {
        v.iter().map(|o| o.key.as_str()).collect()
    }

    fn order(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn preferred_first_then_encounter_order() {
        let got = reorder(
            vec![outcome("toys", 1), outcome("beauty", 1), outcome("garden", 1), outcome("books", 1)],
            &order(&["books", "missing", "beauty"]),
        );
        assert_eq!(keys(&got), ["books", "beauty", "toys", "garden"]);
    }

    #[test]
    fn repeated_preferred_key_counts_once() {
        let got = reorder(vec![outcome("a", 1), outcome("b", 1)], &order(&["b", "b"]));
        assert_eq!(keys(&got), ["b", "a"]);
    }

    #[test]
    fn reorder_is_deterministic() {
        let pref = order(&["c", "a"]);
        let make = || vec![outcome("a", 1), outcome("b", 2), outcome("c", 3)];
        assert_eq!(reorder(make(), &pref), reorder(make(), &pref));
    }

    #[test]
    fn totals_include_empty_categories() {
        let ts = Utc::now();
        let run = aggregate_at(
            vec![outcome("a", 3), outcome("b", 0), outcome("c", 4)],
            &[],
            SourceMode::Live,
            ts,
        );
        assert_eq!(run.totals, 7);
        assert_eq!(run.results.len(), 3);
        assert_eq!(run.ts, ts);
        assert_eq!(run.source, SourceMode::Live.label());
        assert!(run.is_consistent());
    }

    #[test]
    fn nothing_resolved_still_yields_a_record() {
        let run = aggregate(Vec::new(), &order(&["a"]), SourceMode::Curated);
        assert_eq!(run.totals, 0);
        assert!(run.results.is_empty());
    }
}
