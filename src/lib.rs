// src/lib.rs

//! Contribution statistics for the organisations feeding a digital library:
//! load the CSV export once, derive the picker lists, and answer time series,
//! point total and range total queries for charts and summaries.

pub mod aggregate;
pub mod cli;
pub mod error;
pub mod lookup;
pub mod model;
pub mod renderer;
pub mod store;
pub mod summary;

pub use error::{DashError, Result};
pub use model::{ContributionRecord, ContributorSelector, Metric, ALL_CONTRIBUTORS};
pub use store::RecordStore;
