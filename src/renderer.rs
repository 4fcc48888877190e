// src/renderer.rs

use crate::aggregate::time_series;
use crate::error::Result;
use crate::lookup::distinct_contributors;
use crate::model::*;
use crate::store::RecordStore;
use image::{Rgb, RgbImage};
use indicatif::{ParallelProgressIterator, ProgressBar};
use palette::{FromColor, Lch, LinSrgb, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const MARGIN: u32 = 40;
const BG_COLOR: Rgb<u8> = Rgb([250, 250, 252]);
const AXIS_COLOR: Rgb<u8> = Rgb([90, 90, 100]);
const ALL_COLOR: Rgb<u8> = Rgb([31, 119, 180]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    fn plot_width(&self) -> u32 {
        self.width.saturating_sub(2 * MARGIN).max(1)
    }

    fn plot_height(&self) -> u32 {
        self.height.saturating_sub(2 * MARGIN).max(1)
    }

    fn baseline(&self) -> u32 {
        MARGIN + self.plot_height()
    }
}

/// Bar chart of one snapshot, bars in the order given. Taller bars run hotter.
pub fn render_snapshot(bars: &[(String, u64)], size: ChartSize) -> RgbImage {
    let mut image = blank_chart(size);
    if bars.is_empty() {
        return image;
    }

    let max_value = bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f32;
    let slot = size.plot_width() as f32 / bars.len() as f32;
    let bar_width = (slot * 0.8).max(1.0);

    for (i, (_, value)) in bars.iter().enumerate() {
        let fraction = *value as f32 / max_value;
        let bar_height = (fraction * size.plot_height() as f32).round() as u32;
        let x0 = MARGIN + (i as f32 * slot + (slot - bar_width) / 2.0) as u32;
        let x1 = x0 + bar_width as u32;
        let color = value_to_color(fraction);
        fill_rect(
            &mut image,
            x0,
            size.baseline().saturating_sub(bar_height),
            x1,
            size.baseline(),
            color,
        );
    }
    image
}

/// Line chart of a time series. X is proportional to elapsed days, not to point index.
pub fn render_series(points: &[SeriesPoint], color: Rgb<u8>, size: ChartSize) -> RgbImage {
    let mut image = blank_chart(size);
    let (Some(&(first, _)), Some(&(last, _))) = (points.first(), points.last()) else {
        return image;
    };

    let span_days = (last - first).num_days().max(0) as f32;
    let max_value = points.iter().map(|&(_, v)| v).max().unwrap_or(0).max(1) as f32;
    let to_pixel = |&(date, value): &SeriesPoint| -> (f32, f32) {
        let x = if span_days == 0.0 {
            0.5
        } else {
            (date - first).num_days() as f32 / span_days
        };
        let y = value as f32 / max_value;
        (
            MARGIN as f32 + x * size.plot_width() as f32,
            size.baseline() as f32 - y * size.plot_height() as f32,
        )
    };

    let pixels: Vec<(f32, f32)> = points.iter().map(to_pixel).collect();
    if let [only] = pixels.as_slice() {
        plot_dot(&mut image, *only, color);
    }
    for pair in pixels.windows(2) {
        draw_line(&mut image, pair[0], pair[1], color);
    }
    image
}

/// Renders one line chart per contributor (and one for all of them) into `output`.
/// File names carry the contributor's list position, since slugs alone can collide.
pub fn render_report(
    store: &RecordStore,
    metric: Metric,
    output: &Path,
    size: ChartSize,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output)?;

    let names = distinct_contributors(store);
    let colors = generate_contributor_colors(names.len());

    let bar = ProgressBar::new(names.len() as u64);
    bar.set_message("Rendering charts");

    let paths = names
        .par_iter()
        .enumerate()
        .progress_with(bar)
        .map(|(i, name)| -> Result<PathBuf> {
            let selector = ContributorSelector::parse(name);
            let color = if selector.is_all() { ALL_COLOR } else { colors[i] };
            let series = time_series(store, &selector, metric);
            let path = output.join(format!("{i:02}_{}_{}.png", slug(name), metric));
            render_series(&series, color, size).save(&path)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Rendered {} charts into {}", paths.len(), output.display());
    Ok(paths)
}

/// Colour of a contributor's line, keyed on its position in the contributor list
/// so that it is the same in every chart
pub fn selector_color(store: &RecordStore, selector: &ContributorSelector) -> Rgb<u8> {
    if selector.is_all() {
        return ALL_COLOR;
    }
    let names = distinct_contributors(store);
    match names.iter().position(|n| n == selector.label()) {
        Some(index) => generate_contributor_colors(names.len())[index],
        None => AXIS_COLOR,
    }
}

fn generate_contributor_colors(count: usize) -> Vec<Rgb<u8>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let hue = rng.gen_range(0.0f32..360.0f32);
            let color = Lch::new(60.0f32, 70.0f32, hue);
            to_rgb(Srgb::from_color(color))
        })
        .collect()
}

// Blue for small values through yellow to orange for the largest
fn value_to_color(fraction: f32) -> Rgb<u8> {
    let stops: Vec<LinSrgb<f32>> = [
        Lch::new(40.0f32, 40.0f32, 260.0f32),
        Lch::new(60.0f32, 45.0f32, 200.0f32),
        Lch::new(90.0f32, 50.0f32, 95.0f32),
        Lch::new(70.0f32, 80.0f32, 50.0f32),
    ]
    .into_iter()
    .map(LinSrgb::from_color)
    .collect();

    let scaled = fraction.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
    let idx1 = scaled.floor() as usize;
    let idx2 = (idx1 + 1).min(stops.len() - 1);
    let t = scaled.fract();

    let (c1, c2) = (stops[idx1], stops[idx2]);
    let mixed = LinSrgb::new(
        c1.red + (c2.red - c1.red) * t,
        c1.green + (c2.green - c1.green) * t,
        c1.blue + (c2.blue - c1.blue) * t,
    );
    to_rgb(Srgb::from_linear(mixed))
}

fn to_rgb(srgb: Srgb<f32>) -> Rgb<u8> {
    let (r, g, b) = srgb.into_components();
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

fn blank_chart(size: ChartSize) -> RgbImage {
    let mut image = RgbImage::from_pixel(size.width.max(1), size.height.max(1), BG_COLOR);
    let baseline = size.baseline();
    fill_rect(&mut image, MARGIN, baseline, MARGIN + size.plot_width(), baseline + 1, AXIS_COLOR);
    fill_rect(&mut image, MARGIN.saturating_sub(1), MARGIN, MARGIN, baseline + 1, AXIS_COLOR);
    image
}

// Half-open rectangle [x0, x1) x [y0, y1), clipped to the image
fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let (w, h) = image.dimensions();
    for y in y0.min(h)..y1.min(h) {
        for x in x0.min(w)..x1.min(w) {
            image.put_pixel(x, y, color);
        }
    }
}

fn plot_dot(image: &mut RgbImage, (x, y): (f32, f32), color: Rgb<u8>) {
    let (x, y) = (x.round() as i64, y.round() as i64);
    for dy in -1..=1 {
        for dx in -1..=1 {
            put_clipped(image, x + dx, y + dy, color);
        }
    }
}

fn draw_line(image: &mut RgbImage, (x0, y0): (f32, f32), (x1, y1): (f32, f32), color: Rgb<u8>) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = (x0 + (x1 - x0) * t).round() as i64;
        let y = (y0 + (y1 - y0) * t).round() as i64;
        put_clipped(image, x, y, color);
        put_clipped(image, x, y + 1, color);
    }
}

fn put_clipped(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    let (w, h) = image.dimensions();
    if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
        image.put_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SIZE: ChartSize = ChartSize {
        width: 200,
        height: 120,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_snapshot_tallest_bar_reaches_top() {
        let bars = vec![("A".to_string(), 100), ("B".to_string(), 50)];
        let image = render_snapshot(&bars, SIZE);
        assert_eq!(image.dimensions(), (200, 120));
        // First slot centre at the top of the plot area is painted, the second is not
        let slot = SIZE.plot_width() / 2;
        let x_a = MARGIN + slot / 2;
        let x_b = MARGIN + slot + slot / 2;
        assert_ne!(*image.get_pixel(x_a, MARGIN), BG_COLOR);
        assert_eq!(*image.get_pixel(x_b, MARGIN), BG_COLOR);
        assert_ne!(*image.get_pixel(x_b, SIZE.baseline() - 1), BG_COLOR);
    }

    #[test]
    fn test_series_endpoints_are_drawn() {
        let color = Rgb([255, 0, 0]);
        let points = vec![(date(2020, 1, 1), 0), (date(2020, 12, 31), 10)];
        let image = render_series(&points, color, SIZE);
        let right = MARGIN + SIZE.plot_width();
        assert_eq!(*image.get_pixel(right, MARGIN), color);
    }

    #[test]
    fn test_empty_series_renders_axes_only() {
        let image = render_series(&[], ALL_COLOR, SIZE);
        assert!(image.pixels().all(|p| *p != ALL_COLOR));
    }

    #[test]
    fn test_contributor_colors_are_stable() {
        assert_eq!(generate_contributor_colors(5)[3], generate_contributor_colors(30)[3]);
        assert_eq!(generate_contributor_colors(4).len(), 4);
    }

    #[test]
    fn test_selector_color_matches_report_palette() {
        let rec = |name: &str| ContributionRecord {
            contributor: name.to_string(),
            date: date(2020, 1, 1),
            titles: 1,
            volumes: 1,
            pages: 1,
        };
        let store = RecordStore::new(vec![rec("Beta"), rec("Acme")]);
        let palette = generate_contributor_colors(3);
        assert_eq!(selector_color(&store, &ContributorSelector::All), ALL_COLOR);
        assert_eq!(
            selector_color(&store, &ContributorSelector::Named("Acme".into())),
            palette[1]
        );
        assert_eq!(
            selector_color(&store, &ContributorSelector::Named("Beta".into())),
            palette[2]
        );
    }

    #[test]
    fn test_report_colliding_slugs_get_distinct_files() {
        let rec = |name: &str| ContributionRecord {
            contributor: name.to_string(),
            date: date(2020, 1, 1),
            titles: 1,
            volumes: 1,
            pages: 1,
        };
        let store = RecordStore::new(vec![
            rec("Museums Victoria"),
            rec("Museums-Victoria"),
            rec("Soci\u{e9}t\u{e9} Linn\u{e9}enne"),
            rec("Soci t  Linn enne"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let size = ChartSize { width: 80, height: 60 };

        let paths = render_report(&store, Metric::Pages, dir.path(), size).unwrap();
        let on_disk = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(paths.len(), 5);
        assert_eq!(on_disk, paths.len());
        assert!(dir.path().join("00_all_contributors_pages.png").exists());
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Museums Victoria"), "museums_victoria");
        assert_eq!(slug("All Contributors"), "all_contributors");
    }

    #[test]
    fn test_value_to_color_endpoints_differ() {
        assert_ne!(value_to_color(0.0), value_to_color(1.0));
    }
}
