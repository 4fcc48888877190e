// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{display_date, Metric};

#[derive(Error, Debug)]
pub enum DashError {
    #[error("no {metric} record for {contributor} at {}", display_date(.date))]
    MissingRecord {
        contributor: String,
        metric: Metric,
        date: NaiveDate,
    },

    #[error("the input contained no usable contribution rows")]
    EmptyStore,

    #[error("unknown contributor: {0}")]
    UnknownContributor(String),

    #[error("no records dated {0}")]
    UnknownDate(String),

    #[error("line {line}: invalid date {value:?} (expected day/month/year)")]
    InvalidDate { line: u64, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, DashError>;
