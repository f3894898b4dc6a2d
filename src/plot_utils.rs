// plot_utils.rs
use crate::error::VizError;
use crate::stats_utils::ColumnStats;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};

// Matplotlib-ish fills for the three panes.
const SKYBLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHTGREEN: RGBColor = RGBColor(144, 238, 144);
const LIGHTCORAL: RGBColor = RGBColor(240, 128, 128);
const ORANGE: RGBColor = RGBColor(255, 165, 0);

const HISTOGRAM_BINS: usize = 30;
// Pixels per configured figure-size unit.
const UNIT_PX: f64 = 100.0;

/// One pane of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Histogram,
    BoxPlot,
    Violin,
}

/// The requested subset of plot kinds, parsed once at the configuration
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotSelection {
    All,
    Histogram,
    BoxPlot,
    Violin,
}

impl PlotSelection {
    /// Parses the user-facing selector. Anything other than
    /// `all | hist | box | violin` warns and falls back to `All`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "all" => Self::All,
            "hist" => Self::Histogram,
            "box" => Self::BoxPlot,
            "violin" => Self::Violin,
            other => {
                log::warn!("unknown plot type '{other}', using 'all'");
                Self::All
            }
        }
    }

    /// The panes to draw, always in histogram -> box -> violin order.
    pub fn kinds(&self) -> Vec<PlotKind> {
        match self {
            Self::All => vec![PlotKind::Histogram, PlotKind::BoxPlot, PlotKind::Violin],
            Self::Histogram => vec![PlotKind::Histogram],
            Self::BoxPlot => vec![PlotKind::BoxPlot],
            Self::Violin => vec![PlotKind::Violin],
        }
    }

    /// The canonical selector name used in output file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Histogram => "hist",
            Self::BoxPlot => "box",
            Self::Violin => "violin",
        }
    }
}

/// Where an artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Display,
}

/// One rendered chart: its kind, the numeric column it plots, the category
/// label when the table was split, and where it went. Panes of the same
/// (partition, column) figure share one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArtifact {
    pub kind: PlotKind,
    pub column: String,
    pub category: Option<String>,
    pub destination: Destination,
}

/// Explicit rendering context handed to the renderer; there is no ambient
/// plotting state. `output_dir: None` means display-only mode, which never
/// touches the filesystem.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub figsize: (f64, f64),
    pub selection: PlotSelection,
    pub output_dir: Option<PathBuf>,
}

/// Keeps only alphanumerics, spaces, hyphens and underscores, then trims
/// trailing whitespace. Idempotent.
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Composes `{column}[_{category}]_{tag}_visualization.png` from sanitized
/// parts. Distinct inputs that sanitize to the same name overwrite each
/// other; there is no collision avoidance beyond the deterministic name.
pub fn artifact_file_name(column: &str, category: Option<&str>, tag: &str) -> String {
    let safe_column = sanitize_component(column);
    match category {
        Some(cat) => format!(
            "{}_{}_{}_visualization.png",
            safe_column,
            sanitize_component(cat),
            tag
        ),
        None => format!("{safe_column}_{tag}_visualization.png"),
    }
}

/// Ensures the output directory exists, wiping it first when `initialize` is
/// set.
pub fn prepare_output_dir(dir: &Path, initialize: bool) -> Result<(), VizError> {
    if initialize {
        if dir.exists() {
            std::fs::remove_dir_all(dir)?;
            println!("removed existing directory: {}", dir.display());
        }
        std::fs::create_dir_all(dir)?;
        println!("created output directory: {}", dir.display());
    } else if dir.exists() {
        println!("using existing output directory: {}", dir.display());
    } else {
        std::fs::create_dir_all(dir)?;
        println!("created output directory: {}", dir.display());
    }
    Ok(())
}

/// Renders the requested plot kinds for one numeric column within one
/// partition.
///
/// Returns one artifact per requested kind, in the fixed kind order, all
/// sharing a single figure. An empty `values` slice is a soft failure: the
/// column is skipped with a diagnostic and an empty list is returned. The
/// backing drawing resources live only for the duration of this call.
pub fn render_column(
    values: &[f64],
    column: &str,
    category: Option<&str>,
    ctx: &RenderContext,
) -> Result<Vec<PlotArtifact>, VizError> {
    let suffix = category
        .map(|c| format!(" (category: {c})"))
        .unwrap_or_default();
    if values.is_empty() {
        log::warn!("column '{column}'{suffix} has no data, skipping");
        return Ok(Vec::new());
    }
    println!("processing column '{column}'{suffix}, {} values", values.len());

    let stats = match ColumnStats::from_values(values) {
        Some(stats) => stats,
        None => return Ok(Vec::new()),
    };
    let kinds = ctx.selection.kinds();

    let destination = match &ctx.output_dir {
        Some(dir) => {
            let path = dir.join(artifact_file_name(column, category, ctx.selection.file_tag()));
            draw_figure(&path, values, &stats, column, category, &kinds, ctx.figsize)?;
            println!("saved: {}", path.display());
            Destination::File(path)
        }
        None => {
            terminal_preview(values, &stats, column, category);
            Destination::Display
        }
    };

    Ok(kinds
        .into_iter()
        .map(|kind| PlotArtifact {
            kind,
            column: column.to_string(),
            category: category.map(str::to_string),
            destination: destination.clone(),
        })
        .collect())
}

fn render_err<E: std::fmt::Display>(e: E) -> VizError {
    VizError::Render(e.to_string())
}

fn draw_figure(
    path: &Path,
    values: &[f64],
    stats: &ColumnStats,
    column: &str,
    category: Option<&str>,
    kinds: &[PlotKind],
    figsize: (f64, f64),
) -> Result<(), VizError> {
    // A single pane should not inherit the three-pane aspect ratio.
    let width = if kinds.len() == 1 {
        (figsize.0 * UNIT_PX / 3.0) as u32
    } else {
        (figsize.0 * UNIT_PX) as u32
    };
    let height = (figsize.1 * UNIT_PX) as u32;

    let root = BitMapBackend::new(path, (width.max(160), height.max(160))).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title = match category {
        Some(cat) => format!("variable: {column} (category: {cat})"),
        None => format!("variable: {column}"),
    };
    let body = root
        .titled(&title, ("sans-serif", 22).into_font().style(FontStyle::Bold))
        .map_err(render_err)?;

    let panes = body.split_evenly((1, kinds.len()));
    for (pane, kind) in panes.iter().zip(kinds) {
        match kind {
            PlotKind::Histogram => draw_histogram(pane, values, stats, column)?,
            PlotKind::BoxPlot => draw_box_plot(pane, values, stats, column)?,
            PlotKind::Violin => draw_violin(pane, values, stats, column)?,
        }
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

fn bin_counts(values: &[f64], lo: f64, bin_width: f64, bins: usize) -> Vec<u32> {
    let mut counts = vec![0u32; bins];
    for v in values {
        let mut idx = ((v - lo) / bin_width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    counts
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    stats: &ColumnStats,
    column: &str,
) -> Result<(), VizError> {
    let (lo, hi) = padded_range(stats.min, stats.max);
    let bin_width = (hi - lo) / HISTOGRAM_BINS as f64;
    let counts = bin_counts(values, lo, bin_width, HISTOGRAM_BINS);
    let y_max = counts.iter().copied().max().unwrap_or(1).max(1);
    let y_top = y_max + y_max / 10 + 1;

    let mut chart = ChartBuilder::on(area)
        .caption("histogram", ("sans-serif", 14))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(40)
        .build_cartesian_2d(lo..hi, 0u32..y_top)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("frequency")
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = lo + i as f64 * bin_width;
            Rectangle::new([(x0, 0), (x0 + bin_width, count)], SKYBLUE.mix(0.7).filled())
        }))
        .map_err(render_err)?;

    chart
        .draw_series(DashedLineSeries::new(
            [(stats.mean, 0), (stats.mean, y_top)],
            6,
            3,
            RED.stroke_width(2),
        ))
        .map_err(render_err)?
        .label(format!("mean: {:.2}", stats.mean))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED.stroke_width(2)));
    chart
        .draw_series(DashedLineSeries::new(
            [(stats.mean - stats.std_dev, 0), (stats.mean - stats.std_dev, y_top)],
            6,
            3,
            ORANGE.stroke_width(1),
        ))
        .map_err(render_err)?
        .label("±1σ")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], ORANGE.stroke_width(1)));
    chart
        .draw_series(DashedLineSeries::new(
            [(stats.mean + stats.std_dev, 0), (stats.mean + stats.std_dev, y_top)],
            6,
            3,
            ORANGE.stroke_width(1),
        ))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 10))
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_box_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    stats: &ColumnStats,
    column: &str,
) -> Result<(), VizError> {
    let labels = [column];
    // The boxplot element works in f32, so the chart has to as well.
    let (lo, hi) = padded_range(stats.min, stats.max);
    let (lo, hi) = (lo as f32, hi as f32);

    let mut chart = ChartBuilder::on(area)
        .caption("box plot", ("sans-serif", 14))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(48)
        .build_cartesian_2d(labels[..].into_segmented(), lo..hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .y_desc(column)
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(render_err)?;

    let quartiles = Quartiles::new(values);
    chart
        .draw_series(std::iter::once(
            Boxplot::new_vertical(SegmentValue::CenterOf(&column), &quartiles)
                .width(40)
                .style(LIGHTGREEN.mix(0.7)),
        ))
        .map_err(render_err)?;

    chart
        .plotting_area()
        .draw(&Text::new(
            format!("outliers: {}", stats.outlier_count),
            (
                SegmentValue::CenterOf(&column),
                hi - (hi - lo) * 0.05,
            ),
            ("sans-serif", 11).into_font(),
        ))
        .map_err(render_err)?;
    Ok(())
}

fn draw_violin<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    stats: &ColumnStats,
    column: &str,
) -> Result<(), VizError> {
    let (lo, hi) = padded_range(stats.min, stats.max);
    let bandwidth = kde_bandwidth(values, stats.std_dev);

    let steps = 120usize;
    let mut profile = Vec::with_capacity(steps + 1);
    let mut peak = 0.0f64;
    for i in 0..=steps {
        let y = lo + (hi - lo) * i as f64 / steps as f64;
        let density = gaussian_kde(values, y, bandwidth);
        peak = peak.max(density);
        profile.push((y, density));
    }
    let scale = if peak > 0.0 { 0.8 / peak } else { 0.0 };

    let mut chart = ChartBuilder::on(area)
        .caption("violin plot", ("sans-serif", 14))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(48)
        .build_cartesian_2d(-1.0f64..1.0f64, lo..hi)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_x_axis()
        .y_desc(column)
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(render_err)?;

    let mut outline: Vec<(f64, f64)> = profile.iter().map(|&(y, d)| (d * scale, y)).collect();
    outline.extend(profile.iter().rev().map(|&(y, d)| (-d * scale, y)));
    chart
        .draw_series(std::iter::once(Polygon::new(outline, LIGHTCORAL.mix(0.7))))
        .map_err(render_err)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(-0.25, stats.mean), (0.25, stats.mean)],
            BLUE.stroke_width(2),
        )))
        .map_err(render_err)?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(-0.25, stats.median), (0.25, stats.median)],
            BLACK.stroke_width(1),
        )))
        .map_err(render_err)?;

    let lines = [
        format!("mean: {:.2}", stats.mean),
        format!("median: {:.2}", stats.median),
        format!("std: {:.2}", stats.std_dev),
        format!("count: {}", stats.count),
    ];
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.as_str(),
            (10, 24 + 14 * i as i32),
            ("sans-serif", 11).into_font(),
        ))
        .map_err(render_err)?;
    }
    Ok(())
}

fn kde_bandwidth(values: &[f64], std_dev: f64) -> f64 {
    let n = values.len() as f64;
    let bw = 1.06 * std_dev * n.powf(-0.2);
    if bw.is_finite() && bw > 1e-9 {
        bw
    } else {
        // Degenerate sample (constant or single value); any positive width
        // gives a thin spike around the data.
        1.0
    }
}

fn gaussian_kde(values: &[f64], x: f64, bandwidth: f64) -> f64 {
    let norm = values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    values
        .iter()
        .map(|v| {
            let u = (x - v) / bandwidth;
            (-0.5 * u * u).exp()
        })
        .sum::<f64>()
        / norm
}

/// Display-only mode: a stats block plus an ASCII histogram on stdout,
/// standing in for an interactive figure window. Never touches the
/// filesystem.
fn terminal_preview(values: &[f64], stats: &ColumnStats, column: &str, category: Option<&str>) {
    match category {
        Some(cat) => println!("\n--- {column} (category: {cat}) ---"),
        None => println!("\n--- {column} ---"),
    }
    println!(
        "count: {}  mean: {:.2}  median: {:.2}  std: {:.2}  outliers: {}",
        stats.count, stats.mean, stats.median, stats.std_dev, stats.outlier_count
    );

    let (lo, hi) = padded_range(stats.min, stats.max);
    let bin_width = (hi - lo) / HISTOGRAM_BINS as f64;
    let counts = bin_counts(values, lo, bin_width, HISTOGRAM_BINS);
    let peak = counts.iter().copied().max().unwrap_or(1).max(1);
    const BAR_WIDTH: usize = 40;
    for (i, &count) in counts.iter().enumerate() {
        let bar_len = (count as usize * BAR_WIDTH) / peak as usize;
        println!(
            "{:>10.2} | {:<width$} {}",
            lo + i as f64 * bin_width,
            "#".repeat(bar_len),
            count,
            width = BAR_WIDTH
        );
    }
}
