// src/store.rs

use crate::error::{DashError, Result};
use crate::model::*;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Column layout of the contributor export. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Contributor")]
    contributor: String,
    titles: u32,
    volumes: u32,
    pages: u32,
}

/// Immutable table of contribution records, loaded once and shared by reference
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ContributionRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<ContributionRecord>) -> Self {
        warn_duplicates(&records);
        Self { records }
    }

    /// Loads the table from disk. The export is Latin-1, so bytes that are
    /// not valid UTF-8 are decoded one byte per char.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        info!("Loading contribution data from {}", path.display());

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                debug!("{} is not UTF-8, decoding as Latin-1", path.display());
                e.into_bytes().iter().map(|&b| char::from(b)).collect()
            }
        };
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let contributor_col = headers.iter().position(|h| h == "Contributor");

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());

            // Blank spreadsheet rows have empty counts too, so check before deserializing
            if contributor_col.is_some_and(|i| row.get(i).map_or(true, str::is_empty)) {
                warn!("line {}: skipping row with no contributor", line);
                continue;
            }
            let raw: RawRow = row.deserialize(Some(&headers))?;
            let date = parse_source_date(&raw.date).ok_or_else(|| DashError::InvalidDate {
                line,
                value: raw.date.clone(),
            })?;

            records.push(ContributionRecord {
                contributor: raw.contributor,
                date,
                titles: raw.titles,
                volumes: raw.volumes,
                pages: raw.pages,
            });
        }

        info!("Loaded {} contribution records", records.len());
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[ContributionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.records.is_empty() {
            Err(DashError::EmptyStore)
        } else {
            Ok(())
        }
    }

    pub fn has_contributor(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.contributor == name)
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.records.iter().any(|r| r.date == date)
    }

    /// Turns a user-supplied label into a selector, rejecting names the store has never seen
    pub fn resolve_contributor(&self, label: &str) -> Result<ContributorSelector> {
        match ContributorSelector::parse(label) {
            ContributorSelector::Named(name) if !self.has_contributor(&name) => {
                Err(DashError::UnknownContributor(name))
            }
            selector => Ok(selector),
        }
    }

    /// Parses a user-supplied date and checks that the store has rows for it
    pub fn resolve_date(&self, input: &str) -> Result<NaiveDate> {
        match parse_user_date(input) {
            Some(date) if self.has_date(date) => Ok(date),
            _ => Err(DashError::UnknownDate(input.trim().to_string())),
        }
    }
}

fn warn_duplicates(records: &[ContributionRecord]) {
    if records.iter().any(|r| r.contributor == ALL_CONTRIBUTORS) {
        warn!(
            "a contributor is named {:?}; it cannot be selected apart from the aggregate",
            ALL_CONTRIBUTORS
        );
    }

    let mut seen = HashSet::new();
    for r in records {
        if !seen.insert((r.contributor.as_str(), r.date)) {
            warn!(
                "duplicate record for {} at {}; lookups use the first one",
                r.contributor,
                display_date(&r.date)
            );
        }
    }
}
