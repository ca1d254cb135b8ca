//! Plot renderer collaborator.
//!
//! Produces one waterfall image per ranked class: starting from the class
//! baseline, each feature's attribution pushes the running total up or down.
//! Rendering is best-effort; the report assembler logs failures and carries
//! on, so a read-only output directory degrades the report to text-only
//! instead of failing the request.
//!
//! The built-in renderer writes self-contained SVG with no external assets,
//! so artifacts open directly in a browser.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cr_common::{Error, Result};

/// One bar of a waterfall chart.
#[derive(Debug, Clone)]
pub struct WaterfallEntry {
    /// Feature display name.
    pub label: String,
    /// Signed attribution value.
    pub value: f64,
    /// Raw input value, if the feature was supplied.
    pub raw: Option<f64>,
}

/// Waterfall chart data for one (input row, class) pair.
#[derive(Debug, Clone)]
pub struct WaterfallChart {
    /// Chart title, typically the class label.
    pub title: String,
    /// Model baseline the attributions are additive against.
    pub baseline: f64,
    /// Entries in schema order.
    pub entries: Vec<WaterfallEntry>,
}

/// Renders chart data to an image artifact at a caller-specified path.
pub trait PlotRenderer {
    fn render_waterfall(&self, path: &Path, chart: &WaterfallChart) -> Result<()>;
}

/// Renderer that produces no artifacts (tests, `--no-plots`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl PlotRenderer for NoopRenderer {
    fn render_waterfall(&self, _path: &Path, _chart: &WaterfallChart) -> Result<()> {
        Ok(())
    }
}

/// Built-in SVG waterfall renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgWaterfall;

const CHART_WIDTH: f64 = 640.0;
const ROW_HEIGHT: f64 = 28.0;
const MARGIN: f64 = 40.0;
const LABEL_WIDTH: f64 = 120.0;

impl PlotRenderer for SvgWaterfall {
    fn render_waterfall(&self, path: &Path, chart: &WaterfallChart) -> Result<()> {
        let svg = render_svg(chart);
        std::fs::write(path, svg)
            .map_err(|e| Error::Render(format!("writing {}: {e}", path.display())))
    }
}

fn render_svg(chart: &WaterfallChart) -> String {
    let height = MARGIN * 2.0 + ROW_HEIGHT * (chart.entries.len() as f64 + 1.0);

    // Running totals determine each bar's span.
    let mut totals = Vec::with_capacity(chart.entries.len() + 1);
    let mut running = chart.baseline;
    totals.push(running);
    for entry in &chart.entries {
        running += entry.value;
        totals.push(running);
    }
    let min = totals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = totals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(1e-12);
    let plot_width = CHART_WIDTH - LABEL_WIDTH - MARGIN * 2.0;
    let x_of = |v: f64| MARGIN + LABEL_WIDTH + (v - min) / span * plot_width;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{height}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{MARGIN}" y="{}" font-size="16">{}</text>"#,
        MARGIN - 16.0,
        escape_text(&chart.title)
    );

    let mut running = chart.baseline;
    for (i, entry) in chart.entries.iter().enumerate() {
        let y = MARGIN + ROW_HEIGHT * i as f64;
        let start = running;
        running += entry.value;

        let (x0, x1) = if entry.value >= 0.0 {
            (x_of(start), x_of(running))
        } else {
            (x_of(running), x_of(start))
        };
        let color = if entry.value >= 0.0 { "#6BA368" } else { "#C0554E" };
        let width = (x1 - x0).max(1.0);

        let label = match entry.raw {
            Some(raw) => format!("{} = {raw}", entry.label),
            None => format!("{} (absent)", entry.label),
        };
        let _ = writeln!(
            svg,
            r#"<text x="{MARGIN}" y="{}">{}</text>"#,
            y + ROW_HEIGHT * 0.6,
            escape_text(&label)
        );
        let _ = writeln!(
            svg,
            r#"<rect x="{x0:.2}" y="{}" width="{width:.2}" height="{}" fill="{color}"/>"#,
            y + ROW_HEIGHT * 0.15,
            ROW_HEIGHT * 0.6
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" font-size="10">{:+.5}</text>"#,
            x1 + 4.0,
            y + ROW_HEIGHT * 0.6,
            entry.value
        );
    }

    // Final total marker.
    let y = MARGIN + ROW_HEIGHT * chart.entries.len() as f64;
    let _ = writeln!(
        svg,
        r#"<text x="{MARGIN}" y="{}">total = {running:.5} (baseline {:.5})</text>"#,
        y + ROW_HEIGHT * 0.6,
        chart.baseline
    );
    svg.push_str("</svg>\n");
    svg
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Deterministic image filename for a class label: lower-cased, spaces
/// replaced with underscores.
pub fn image_filename(label: &str) -> String {
    format!("{}.svg", label.to_lowercase().replace(' ', "_"))
}

/// Reset the output directory: remove it if present, then recreate it.
///
/// Two-phase and non-atomic; concurrent requests sharing a directory must
/// serialize around this externally.
pub fn reset_output_dir(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    std::fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}
