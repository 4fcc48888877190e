// src/aggregate.rs

//! Queries behind the charts and summaries. Every function is a pure scan
//! over the store; nothing is cached between calls.

use crate::error::{DashError, Result};
use crate::model::*;
use crate::store::RecordStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Time series of `metric` for the selected contributor, oldest first.
///
/// A named contributor yields its own rows, skipping those where the metric
/// is zero. `All` sums the metric per date, so each date appears once.
pub fn time_series(
    store: &RecordStore,
    contributor: &ContributorSelector,
    metric: Metric,
) -> Vec<SeriesPoint> {
    match contributor {
        ContributorSelector::Named(name) => {
            let mut points: Vec<SeriesPoint> = store
                .records()
                .iter()
                .filter(|r| &r.contributor == name)
                .map(|r| (r.date, r.value(metric)))
                .filter(|&(_, v)| v > 0)
                .collect();
            points.sort_by_key(|&(date, _)| date);
            points
        }
        ContributorSelector::All => {
            let mut per_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
            for r in store.records() {
                *per_date.entry(r.date).or_default() += r.value(metric);
            }
            per_date.into_iter().collect()
        }
    }
}

/// Metric value as of a single date.
///
/// For a named contributor this is the value of its row at `at` (the first
/// one, should the table carry duplicates). For `All` it is the sum over every
/// row at `at`. Either way a missing row is an error, never zero.
pub fn point_total(
    store: &RecordStore,
    contributor: &ContributorSelector,
    metric: Metric,
    at: NaiveDate,
) -> Result<u64> {
    let missing = || DashError::MissingRecord {
        contributor: contributor.label().to_string(),
        metric,
        date: at,
    };

    match contributor {
        ContributorSelector::Named(name) => store
            .records()
            .iter()
            .find(|r| r.date == at && &r.contributor == name)
            .map(|r| r.value(metric))
            .ok_or_else(missing),
        ContributorSelector::All => {
            let mut rows = store.records().iter().filter(|r| r.date == at).peekable();
            if rows.peek().is_none() {
                return Err(missing());
            }
            Ok(rows.map(|r| r.value(metric)).sum())
        }
    }
}

/// Contributions made between two dates: `point_total(to) - point_total(from)`.
///
/// Negative when `from` is later than `to`, or when content was reassigned
/// away from the contributor in between.
pub fn range_total(
    store: &RecordStore,
    contributor: &ContributorSelector,
    metric: Metric,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64> {
    let end = point_total(store, contributor, metric, to)?;
    let start = point_total(store, contributor, metric, from)?;
    let delta = end as i64 - start as i64;
    debug!(
        "{} {} between {} and {}: {}",
        contributor,
        metric,
        display_date(&from),
        display_date(&to),
        delta
    );
    Ok(delta)
}

/// Every contributor's value at one date, largest first (ties by name)
pub fn snapshot(store: &RecordStore, metric: Metric, at: NaiveDate) -> Vec<(String, u64)> {
    let mut per_contributor: BTreeMap<&str, u64> = BTreeMap::new();
    for r in store.records().iter().filter(|r| r.date == at) {
        per_contributor.entry(r.contributor.as_str()).or_insert(r.value(metric));
    }

    let mut bars: Vec<(String, u64)> = per_contributor
        .into_iter()
        .map(|(name, v)| (name.to_string(), v))
        .collect();
    bars.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    bars
}
