// Generated artifacts: the rating histogram (PNG) and the static
// website built from an HTML template.

use crate::catalog::entries;
use crate::error::ReportError;
use crate::movie::Catalog;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

/// Marker in the template replaced by the movie list.
pub const GRID_MARKER: &str = "__TEMPLATE_MOVIE_GRID__";

pub const HISTOGRAM_BINS: usize = 10;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);

/// Equal-width bins between the lowest and highest rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub low: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_range(&self, idx: usize) -> (f64, f64) {
        let start = self.low + self.width * idx as f64;
        (start, start + self.width)
    }
}

/// The top edge is inclusive, so the highest rating lands in the last
/// bin. A single distinct value is centered in a range one wide.
pub fn histogram_bins(ratings: &[f64], bins: usize) -> Option<Histogram> {
    if ratings.is_empty() || bins == 0 {
        return None;
    }
    let mut low = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / bins as f64;

    let mut counts = vec![0; bins];
    for r in ratings {
        let idx = (((r - low) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { low, width, counts })
}

pub fn render_histogram(hist: &Histogram) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let plot_w = WIDTH - 2 * MARGIN;
    let plot_h = HEIGHT - 2 * MARGIN;
    let base_y = HEIGHT - MARGIN;
    let max_count = hist.counts.iter().copied().max().unwrap_or(0).max(1) as u32;

    // one horizontal line per movie count
    if max_count <= 20 {
        for n in 1..=max_count {
            let y = base_y - plot_h * n / max_count;
            for x in MARGIN..WIDTH - MARGIN {
                img.put_pixel(x, y, GRID);
            }
        }
    }

    let bins = hist.counts.len() as u32;
    let bar_w = plot_w / bins;
    for (i, &count) in hist.counts.iter().enumerate() {
        let bar_h = plot_h * count as u32 / max_count;
        let x0 = MARGIN + bar_w * i as u32;
        // 1px gap between bars
        for x in x0 + 1..x0 + bar_w {
            for y in base_y - bar_h..base_y {
                img.put_pixel(x, y, BAR);
            }
        }
    }

    for x in MARGIN..=WIDTH - MARGIN {
        img.put_pixel(x, base_y, AXIS);
    }
    for y in MARGIN..=base_y {
        img.put_pixel(MARGIN, y, AXIS);
    }
    img
}

/// Plot `ratings` and save the image to `path` (format from extension).
pub fn write_histogram(ratings: &[f64], path: &Path) -> Result<Histogram, ReportError> {
    let hist = histogram_bins(ratings, HISTOGRAM_BINS).ok_or(ReportError::NoRatings)?;
    render_histogram(&hist).save(path)?;
    log::info!("histogram written to {}", path.display());
    Ok(hist)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn serialize_movie(title: &str, year: i32, poster: &str) -> String {
    format!(
        "        <li>\n\
         \x20         <div class=\"movie\">\n\
         \x20           <img class=\"movie-poster\" src=\"{}\" title=\"\"/>\n\
         \x20         </div>\n\
         \x20         <div class=\"movie-title\">{}</div>\n\
         \x20         <div class=\"movie-year\">{}</div>\n\
         \x20       </li>\n",
        escape_html(poster),
        escape_html(title),
        year
    )
}

pub fn render_website(template: &str, movies: &Catalog) -> String {
    let grid: String = entries(movies)
        .map(|(title, m)| serialize_movie(title, m.year, &m.poster))
        .collect();
    template.replace(GRID_MARKER, &grid)
}

pub fn generate_website(
    template_path: &Path,
    output_path: &Path,
    movies: &Catalog,
) -> Result<(), ReportError> {
    let template = fs::read_to_string(template_path).map_err(|source| ReportError::Template {
        path: template_path.to_path_buf(),
        source,
    })?;
    if !template.contains(GRID_MARKER) {
        log::warn!("{} has no {} marker", template_path.display(), GRID_MARKER);
    }
    let html = render_website(&template, movies);
    fs::write(output_path, html).map_err(|source| ReportError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    log::info!("website written to {}", output_path.display());
    Ok(())
}
