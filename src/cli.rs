// src/cli.rs

use crate::model::{Metric, ALL_CONTRIBUTORS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore contribution statistics per organisation", long_about = None)]
pub struct Args {
    /// Path to the contributor CSV export
    #[arg(short, long, global = true, default_value = "contributordata_au.csv")]
    pub data: PathBuf,

    /// Enable verbose trace output on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List contributors, "All Contributors" first
    Contributors,

    /// List the dates present in the data, newest first
    Dates,

    /// Print the time series for a contributor
    Series {
        #[command(flatten)]
        selection: Selection,

        /// Output format
        #[arg(long, value_enum, default_value_t = SeriesFormat::Table)]
        format: SeriesFormat,
    },

    /// Print the latest total and the total between two dates
    Totals {
        #[command(flatten)]
        selection: Selection,

        /// Start of the range (d/m/yyyy or yyyy-mm-dd); defaults to the earliest date
        #[arg(long)]
        from: Option<String>,

        /// End of the range (d/m/yyyy or yyyy-mm-dd); defaults to the latest date
        #[arg(long)]
        to: Option<String>,
    },

    /// Write the snapshot bar chart and the time series line chart as PNG files
    Render {
        #[command(flatten)]
        selection: Selection,

        /// Date of the snapshot bar chart; defaults to the latest date
        #[arg(long)]
        at: Option<String>,

        /// Directory to save the output PNG files
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Write one line chart per contributor
    Report {
        /// Metric to chart
        #[arg(short, long, value_enum, default_value_t = Metric::Pages)]
        metric: Metric,

        /// Directory to save the output PNG files
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        size: SizeArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct Selection {
    /// Contributor name, or "All Contributors"
    #[arg(short, long, default_value = ALL_CONTRIBUTORS)]
    pub contributor: String,

    /// Metric to read or sum
    #[arg(short, long, value_enum, default_value_t = Metric::Pages)]
    pub metric: Metric,
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct SizeArgs {
    /// Width of the output images in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Height of the output images in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum SeriesFormat {
    /// Aligned columns for reading
    Table,
    /// `date,value` rows
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["contrib-dash", "totals"]);
        assert_eq!(args.data, PathBuf::from("contributordata_au.csv"));
        match args.command {
            Command::Totals { selection, from, to } => {
                assert_eq!(selection.contributor, ALL_CONTRIBUTORS);
                assert_eq!(selection.metric, Metric::Pages);
                assert!(from.is_none() && to.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_data_after_subcommand() {
        let args = Args::parse_from([
            "contrib-dash", "series", "-c", "Acme", "-m", "titles", "--data", "x.csv",
        ]);
        assert_eq!(args.data, PathBuf::from("x.csv"));
        match args.command {
            Command::Series { selection, format } => {
                assert_eq!(selection.contributor, "Acme");
                assert_eq!(selection.metric, Metric::Titles);
                assert_eq!(format, SeriesFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_metric_rejected() {
        assert!(Args::try_parse_from(["contrib-dash", "series", "-m", "words"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
