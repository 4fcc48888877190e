// src/lookup.rs

//! Option lists derived from the record store: the contributor picker and the date pickers.

use crate::model::ALL_CONTRIBUTORS;
use crate::store::RecordStore;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Distinct contributor names in alphabetical order, with the
/// "All Contributors" sentinel always first, even for an empty store.
/// A data row carrying the sentinel label is not listed a second time.
pub fn distinct_contributors(store: &RecordStore) -> Vec<String> {
    let names: BTreeSet<&str> = store
        .records()
        .iter()
        .map(|r| r.contributor.as_str())
        .filter(|&name| name != ALL_CONTRIBUTORS)
        .collect();

    std::iter::once(ALL_CONTRIBUTORS)
        .chain(names)
        .map(String::from)
        .collect()
}

/// Distinct dates, newest first
pub fn distinct_dates(store: &RecordStore) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = store.records().iter().map(|r| r.date).collect();
    dates.into_iter().rev().collect()
}

pub fn latest_date(store: &RecordStore) -> Option<NaiveDate> {
    store.records().iter().map(|r| r.date).max()
}

pub fn earliest_date(store: &RecordStore) -> Option<NaiveDate> {
    store.records().iter().map(|r| r.date).min()
}
