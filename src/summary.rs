// src/summary.rs

//! Sentences shown under the charts.

use crate::error::{DashError, Result};
use crate::model::*;
use chrono::NaiveDate;

pub fn series_title(contributor: &ContributorSelector, metric: Metric) -> String {
    match contributor {
        ContributorSelector::All => {
            format!("The number of {metric} contributed by all contributors")
        }
        ContributorSelector::Named(name) => {
            format!("The number of {metric} contributed by {name}")
        }
    }
}

pub fn snapshot_title(metric: Metric, at: NaiveDate) -> String {
    format!(
        "Number of {metric} contributed by each member (at {}).",
        display_date(&at)
    )
}

/// Sentence for a point total; a missing record becomes a "no data" sentence
pub fn total_summary(
    contributor: &ContributorSelector,
    metric: Metric,
    total: &Result<u64>,
) -> String {
    match (contributor, total) {
        (ContributorSelector::All, Ok(v)) => {
            format!("{ALL_CONTRIBUTORS} have together contributed {v} {metric}.")
        }
        (ContributorSelector::Named(name), Ok(v)) => {
            format!("{name} has contributed a total of {v} {metric}.")
        }
        (_, Err(e)) => no_data(contributor, metric, e),
    }
}

pub fn range_summary(
    contributor: &ContributorSelector,
    metric: Metric,
    delta: &Result<i64>,
    from: NaiveDate,
    to: NaiveDate,
) -> String {
    let (from, to) = (display_date(&from), display_date(&to));
    match (contributor, delta) {
        (ContributorSelector::All, Ok(v)) => format!(
            "{ALL_CONTRIBUTORS} have together contributed {v} {metric} between {from} and {to}."
        ),
        (ContributorSelector::Named(name), Ok(v)) => {
            format!("{name} has contributed {v} {metric} between {from} and {to}.")
        }
        (_, Err(e)) => no_data(contributor, metric, e),
    }
}

fn no_data(contributor: &ContributorSelector, metric: Metric, err: &DashError) -> String {
    match err {
        DashError::MissingRecord { date, .. } => format!(
            "No {metric} data for {contributor} at {}.",
            display_date(date)
        ),
        other => format!(
            "No {metric} data for {contributor}: {}.",
            other.to_string().trim_end_matches('.')
        ),
    }
}
