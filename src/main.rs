// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use contrib_dash::aggregate::{point_total, range_total, snapshot, time_series};
use contrib_dash::cli::{Args, Command, SeriesFormat, SizeArgs};
use contrib_dash::lookup::{distinct_contributors, distinct_dates, earliest_date, latest_date};
use contrib_dash::model::display_date;
use contrib_dash::renderer::{self, ChartSize};
use contrib_dash::summary;
use contrib_dash::{DashError, RecordStore};
use std::fs;
use std::io;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);
    let start_time = Instant::now();

    let store = RecordStore::from_path(&args.data)
        .with_context(|| format!("failed to load {}", args.data.display()))?;
    tracing::debug!("Loaded {} records in {:.2?}", store.len(), start_time.elapsed());

    run(&store, args.command)?;

    tracing::debug!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}

fn run(store: &RecordStore, command: Command) -> Result<()> {
    match command {
        Command::Contributors => {
            for name in distinct_contributors(store) {
                println!("{name}");
            }
        }
        Command::Dates => {
            for date in distinct_dates(store) {
                println!("{}", display_date(&date));
            }
        }
        Command::Series { selection, format } => {
            let contributor = store.resolve_contributor(&selection.contributor)?;
            let series = time_series(store, &contributor, selection.metric);
            match format {
                SeriesFormat::Table => {
                    println!("{}", summary::series_title(&contributor, selection.metric));
                    for (date, value) in &series {
                        println!("{:>10}  {}", display_date(date), value);
                    }
                }
                SeriesFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(io::stdout());
                    writer.write_record(["date", selection.metric.as_str()])?;
                    for (date, value) in &series {
                        writer.write_record([display_date(date), value.to_string()])?;
                    }
                    writer.flush()?;
                }
            }
        }
        Command::Totals { selection, from, to } => {
            store.ensure_non_empty()?;
            let contributor = store.resolve_contributor(&selection.contributor)?;
            let metric = selection.metric;
            let (from, to) = date_bounds(store, from.as_deref(), to.as_deref())?;

            let total = point_total(store, &contributor, metric, require_latest(store)?);
            println!("{}", summary::total_summary(&contributor, metric, &total));

            let delta = range_total(store, &contributor, metric, from, to);
            println!("{}", summary::range_summary(&contributor, metric, &delta, from, to));
        }
        Command::Render {
            selection,
            at,
            output,
            size,
        } => {
            store.ensure_non_empty()?;
            let contributor = store.resolve_contributor(&selection.contributor)?;
            let metric = selection.metric;
            let at = match at {
                Some(input) => store.resolve_date(&input)?,
                None => require_latest(store)?,
            };
            fs::create_dir_all(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;

            let bars = snapshot(store, metric, at);
            let snapshot_path = output.join("snapshot.png");
            renderer::render_snapshot(&bars, chart_size(size)).save(&snapshot_path)?;
            println!("{} -> {}", summary::snapshot_title(metric, at), snapshot_path.display());

            let color = renderer::selector_color(store, &contributor);
            let series = time_series(store, &contributor, metric);
            let series_path = output.join("series.png");
            renderer::render_series(&series, color, chart_size(size)).save(&series_path)?;
            println!("{} -> {}", summary::series_title(&contributor, metric), series_path.display());
        }
        Command::Report {
            metric,
            output,
            size,
        } => {
            store.ensure_non_empty()?;
            let paths = renderer::render_report(store, metric, &output, chart_size(size))?;
            println!("Wrote {} charts to {}", paths.len(), output.display());
        }
    }
    Ok(())
}

/// Resolves the range endpoints, defaulting to the earliest and latest dates
fn date_bounds(
    store: &RecordStore,
    from: Option<&str>,
    to: Option<&str>,
) -> contrib_dash::Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let from = match from {
        Some(input) => store.resolve_date(input)?,
        None => earliest_date(store).ok_or(DashError::EmptyStore)?,
    };
    let to = match to {
        Some(input) => store.resolve_date(input)?,
        None => require_latest(store)?,
    };
    Ok((from, to))
}

fn require_latest(store: &RecordStore) -> contrib_dash::Result<chrono::NaiveDate> {
    latest_date(store).ok_or(DashError::EmptyStore)
}

fn chart_size(size: SizeArgs) -> ChartSize {
    ChartSize {
        width: size.width,
        height: size.height,
    }
}
