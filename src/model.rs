// src/model.rs

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Label of the synthetic contributor that stands for every organisation
pub const ALL_CONTRIBUTORS: &str = "All Contributors";

/// One row of the contribution table: cumulative counts for a contributor as of a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRecord {
    pub contributor: String,
    pub date: NaiveDate,
    pub titles: u32,
    pub volumes: u32,
    pub pages: u32,
}

impl ContributionRecord {
    pub fn value(&self, metric: Metric) -> u64 {
        let v = match metric {
            Metric::Titles => self.titles,
            Metric::Volumes => self.volumes,
            Metric::Pages => self.pages,
        };
        u64::from(v)
    }
}

/// Which countable unit to read or sum
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Titles,
    Volumes,
    Pages,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Titles, Metric::Volumes, Metric::Pages];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Titles => "titles",
            Metric::Volumes => "volumes",
            Metric::Pages => "pages",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "titles" => Ok(Metric::Titles),
            "volumes" => Ok(Metric::Volumes),
            "pages" => Ok(Metric::Pages),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// A specific contributor, or every contributor at once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContributorSelector {
    All,
    Named(String),
}

impl ContributorSelector {
    /// Maps the sentinel label to `All`; anything else is taken as a name.
    /// Use `RecordStore::resolve_contributor` to also check the name exists.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label == ALL_CONTRIBUTORS {
            ContributorSelector::All
        } else {
            ContributorSelector::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContributorSelector::All => ALL_CONTRIBUTORS,
            ContributorSelector::Named(name) => name,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ContributorSelector::All)
    }
}

impl fmt::Display for ContributorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single (date, value) point of a time series
pub type SeriesPoint = (NaiveDate, u64);

/// Parses `d/m/yyyy` (leading zeros optional) as found in the source table
pub fn parse_source_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// Parses a date typed by a user: `d/m/yyyy` or ISO `yyyy-mm-dd`
pub fn parse_user_date(s: &str) -> Option<NaiveDate> {
    parse_source_date(s).or_else(|| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Formats a date the way the source table writes it
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Pages".parse::<Metric>().unwrap(), Metric::Pages);
        assert_eq!(" titles ".parse::<Metric>().unwrap(), Metric::Titles);
        assert!("words".parse::<Metric>().is_err());
    }

    #[test]
    fn test_selector_sentinel() {
        assert_eq!(
            ContributorSelector::parse(ALL_CONTRIBUTORS),
            ContributorSelector::All
        );
        assert_eq!(
            ContributorSelector::parse("Museums Victoria"),
            ContributorSelector::Named("Museums Victoria".to_string())
        );
    }

    #[test]
    fn test_date_parsing_and_display() {
        let d = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
        assert_eq!(parse_source_date("1/12/2020"), Some(d));
        assert_eq!(parse_source_date("01/12/2020"), Some(d));
        assert_eq!(parse_user_date("2020-12-01"), Some(d));
        assert_eq!(parse_source_date("2020-12-01"), None);
        assert_eq!(display_date(&d), "1/12/2020");
    }

    #[test]
    fn test_record_value() {
        let r = ContributionRecord {
            contributor: "Acme".into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            titles: 1,
            volumes: 2,
            pages: 3,
        };
        assert_eq!(r.value(Metric::Titles), 1);
        assert_eq!(r.value(Metric::Volumes), 2);
        assert_eq!(r.value(Metric::Pages), 3);
    }
}
