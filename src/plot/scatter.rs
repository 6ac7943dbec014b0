//! Scatter-plot SVG artifact.
//!
//! Renders (actual, predicted) pairs and the fitted regression line
//! into a self-contained SVG. Both axes share the documented price
//! window; points outside it are clipped by the viewport.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::data::DataError;

use super::line::RegressionLine;

/// Scatter-plot rendering options.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Upper bound of both axes (prices above are off-chart).
    pub axis_max: f64,
    /// x-value the regression line is drawn out to.
    pub line_max: f64,
    /// Canvas size in pixels (the chart is square).
    pub size: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            axis_max: 60_000.0,
            line_max: 50_000.0,
            size: 640,
        }
    }
}

const MARGIN: f64 = 60.0;

/// Render the scatter and regression line as an SVG document.
pub fn render_scatter_svg(
    pairs: &[(f32, f32)],
    line: Option<&RegressionLine>,
    options: &PlotOptions,
) -> String {
    let size = options.size as f64;
    let span = size - 2.0 * MARGIN;
    let scale = span / options.axis_max;
    let to_px = |x: f64, y: f64| {
        let px = MARGIN + x * scale;
        let py = size - MARGIN - y * scale;
        (px, py)
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
        options.size
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{0}" height="{0}" fill="white"/>"#,
        options.size
    );

    // Axes box.
    let _ = writeln!(
        svg,
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        MARGIN, MARGIN, span, span
    );

    // Title and axis labels.
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">Distribution of price prediction</text>"#,
        size / 2.0,
        MARGIN / 2.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">Measured</text>"#,
        size / 2.0,
        size - MARGIN / 4.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12" transform="rotate(-90 {0:.1} {1:.1})">Predicted</text>"#,
        MARGIN / 4.0,
        size / 2.0
    );

    // Axis extent labels.
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="10">0</text>"#,
        MARGIN - 10.0,
        size - MARGIN + 14.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{}</text>"#,
        size - MARGIN,
        size - MARGIN + 14.0,
        options.axis_max
    );

    // Points.
    let _ = writeln!(svg, r#"<g fill="steelblue" fill-opacity="0.6">"#);
    for &(actual, predicted) in pairs {
        let (px, py) = to_px(actual as f64, predicted as f64);
        if px >= MARGIN && px <= size - MARGIN && py >= MARGIN && py <= size - MARGIN {
            let _ = writeln!(svg, r#"<circle cx="{px:.1}" cy="{py:.1}" r="3"/>"#);
        }
    }
    let _ = writeln!(svg, "</g>");

    // Regression line from x = 1 out to the configured maximum.
    if let Some(line) = line {
        let [(x1, y1), (x2, y2)] = line.endpoints(1.0, options.line_max);
        let (px1, py1) = to_px(x1, y1.clamp(0.0, options.axis_max));
        let (px2, py2) = to_px(x2, y2.clamp(0.0, options.axis_max));
        let _ = writeln!(
            svg,
            r#"<line x1="{px1:.1}" y1="{py1:.1}" x2="{px2:.1}" y2="{py2:.1}" stroke="crimson" stroke-width="2"/>"#
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render and write the scatter artifact to a file.
pub fn write_scatter_svg(
    path: impl AsRef<Path>,
    pairs: &[(f32, f32)],
    line: Option<&RegressionLine>,
    options: &PlotOptions,
) -> Result<(), DataError> {
    fs::write(path, render_scatter_svg(pairs, line, options))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_points_and_line() {
        let pairs = vec![(10_000.0, 11_000.0), (30_000.0, 28_000.0)];
        let line = RegressionLine {
            slope: 0.9,
            intercept: 500.0,
        };
        let svg = render_scatter_svg(&pairs, Some(&line), &PlotOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Distribution of price prediction"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn off_window_points_are_dropped() {
        let pairs = vec![(10_000.0, 11_000.0), (90_000.0, 95_000.0)];
        let svg = render_scatter_svg(&pairs, None, &PlotOptions::default());
        assert_eq!(svg.matches("<circle").count(), 1);
    }
}
