//! Composite plots: a saved drawing surface with its ordered primitives.
//!
//! Coordinates of text and legend boxes are NDC (0..1 across the canvas,
//! origin bottom-left). Text sizes are pixels; axis title/label sizes are
//! fractions of the pad height.

use hc_core::{AxisRange, Hist1D, padded_x_range, padded_y_range};
use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CanvasSize {
    /// Create a canvas size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The 800×800 square canvas of the comparison plots.
    pub const fn square() -> Self {
        Self::new(800, 800)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::square()
    }
}

/// Pad margins as fractions of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self { left: 0.1, right: 0.1, top: 0.1, bottom: 0.1 }
    }
}

/// Drawing-surface options.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PadStyle {
    /// Frame margins.
    pub margins: Margins,
    /// Logarithmic y axis.
    pub log_y: bool,
    /// Tick marks on the top and right frame edges too.
    pub ticks_all_sides: bool,
    /// Keep the frame square regardless of margins.
    pub fixed_aspect: bool,
}

/// Title and size settings of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    /// Axis title (TLatex syntax).
    pub title: String,
    /// Center the title along the axis.
    pub centered: bool,
    /// Title offset multiplier.
    pub title_offset: f64,
    /// Title size.
    pub title_size: f64,
    /// Tick label size.
    pub label_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            title: String::new(),
            centered: false,
            title_offset: 1.0,
            title_size: 0.035,
            label_size: 0.035,
        }
    }
}

/// A histogram drawn as a line outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    /// The histogram values.
    pub hist: Hist1D,
    /// Line color (`#RRGGBB`).
    pub line_color: String,
    /// Line width in pixels.
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// X axis style (used when this series provides the frame).
    #[serde(default)]
    pub x_axis: AxisStyle,
    /// Y axis style (used when this series provides the frame).
    #[serde(default)]
    pub y_axis: AxisStyle,
    /// Display range of the x axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_range: Option<AxisRange>,
    /// Display range of the y axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<AxisRange>,
    /// Draw a statistics box.
    #[serde(default)]
    pub show_stats: bool,
    /// This series provides the axes of the plot.
    #[serde(default)]
    pub frame: bool,
}

fn default_line_width() -> f64 {
    1.0
}

impl HistogramSeries {
    /// Wrap `hist` with a line color and default styles.
    pub fn new(hist: Hist1D, line_color: impl Into<String>) -> Self {
        Self {
            hist,
            line_color: line_color.into(),
            line_width: default_line_width(),
            x_axis: AxisStyle::default(),
            y_axis: AxisStyle::default(),
            x_range: None,
            y_range: None,
            show_stats: true,
            frame: false,
        }
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.hist.name
    }

    /// Padded x range over the displayed bins.
    pub fn display_x_range(&self) -> Result<AxisRange, StyleError> {
        let h = &self.hist;
        if h.n_bins() == 0 {
            return Err(StyleError::NoBins { name: h.name.clone() });
        }
        if h.bin_edges.iter().any(|e| !e.is_finite()) {
            return Err(StyleError::NonFinite { name: h.name.clone(), what: "bin edge" });
        }
        let (first, last) = h.displayed_bins();
        let range = padded_x_range(
            AxisRange::new(h.bin_low_edge(first), h.bin_up_edge(last)),
            AxisRange::new(h.x_min(), h.x_max()),
        );
        check_range(&h.name, "x", range)
    }
}

/// Padded y range of every series: observed extremes over the displayed
/// bins, smallest positive content over all bins.
///
/// `name` identifies the plot in the error.
pub fn display_y_range(
    name: &str,
    series: &[&HistogramSeries],
    log_y: bool,
) -> Result<AxisRange, StyleError> {
    let all: Vec<&[f64]> = series.iter().map(|s| s.hist.bin_content.as_slice()).collect();
    if all.iter().flat_map(|c| c.iter()).any(|v| !v.is_finite()) {
        return Err(StyleError::NonFinite { name: name.to_string(), what: "bin content" });
    }
    let displayed: Vec<&[f64]> = series.iter().map(|s| s.hist.displayed_contents()).collect();
    let range = padded_y_range(&displayed, &all, log_y)
        .ok_or_else(|| StyleError::NoBins { name: name.to_string() })?;
    check_range(name, "y", range)
}

fn check_range(name: &str, axis: &'static str, range: AxisRange) -> Result<AxisRange, StyleError> {
    if range.min.is_finite() && range.max.is_finite() && range.min < range.max {
        Ok(range)
    } else {
        Err(StyleError::InvalidRange {
            name: name.to_string(),
            axis,
            min: range.min,
            max: range.max,
        })
    }
}

/// Vertical anchoring of an annotation relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    /// Position is the left end of the text baseline (ROOT align 11).
    #[default]
    BottomLeft,
    /// Position is the top-left corner of the text (ROOT align 13).
    TopLeft,
}

/// Free text placed in NDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// NDC x.
    pub x: f64,
    /// NDC y.
    pub y: f64,
    /// Text (TLatex syntax).
    pub text: String,
    /// Text size in pixels.
    pub size: f64,
    /// Anchor.
    #[serde(default)]
    pub anchor: TextAnchor,
}

/// One legend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Label (TLatex syntax).
    pub label: String,
    /// Line color of the series (`#RRGGBB`).
    pub color: String,
    /// Line width of the series.
    pub line_width: f64,
}

/// Legend box in NDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    /// Lower-left x.
    pub x1: f64,
    /// Lower-left y.
    pub y1: f64,
    /// Upper-right x.
    pub x2: f64,
    /// Upper-right y.
    pub y2: f64,
    /// Draw a border.
    #[serde(default)]
    pub border: bool,
    /// Text size in pixels.
    pub text_size: f64,
    /// Entries, top to bottom.
    pub entries: Vec<LegendEntry>,
}

/// One drawable element of a composite plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// A histogram outline.
    Histogram(HistogramSeries),
    /// Free text.
    Text(Annotation),
    /// A legend box.
    Legend(Legend),
}

/// A saved drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositePlot {
    /// Entry name (the histogram name for comparison plots).
    pub name: String,
    /// Plot title.
    #[serde(default)]
    pub title: String,
    /// Canvas size.
    #[serde(default)]
    pub canvas: CanvasSize,
    /// Pad options.
    #[serde(default)]
    pub pad: PadStyle,
    /// Primitives in drawing order.
    pub primitives: Vec<Primitive>,
}

impl CompositePlot {
    /// Empty plot.
    pub fn new(name: impl Into<String>, canvas: CanvasSize, pad: PadStyle) -> Self {
        let name = name.into();
        Self { title: name.clone(), name, canvas, pad, primitives: Vec::new() }
    }

    /// Histogram primitives in drawing order.
    pub fn histograms(&self) -> impl Iterator<Item = &HistogramSeries> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Histogram(h) => Some(h),
            _ => None,
        })
    }

    /// Mutable histogram primitives in drawing order.
    pub fn histograms_mut(&mut self) -> impl Iterator<Item = &mut HistogramSeries> {
        self.primitives.iter_mut().filter_map(|p| match p {
            Primitive::Histogram(h) => Some(h),
            _ => None,
        })
    }

    /// The series providing the axes: the one flagged `frame`, else the first.
    pub fn frame(&self) -> Option<&HistogramSeries> {
        self.histograms().find(|h| h.frame).or_else(|| self.histograms().next())
    }

    /// Text annotations in drawing order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(t) => Some(t),
            _ => None,
        })
    }

    /// The first legend, if any.
    pub fn legend(&self) -> Option<&Legend> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Legend(l) => Some(l),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(name: &str, contents: Vec<f64>) -> HistogramSeries {
        let n = contents.len() as f64;
        HistogramSeries::new(Hist1D::uniform(name, "", 0.0, n, contents).unwrap(), "#ff0000")
    }

    #[test]
    fn x_range_pads_displayed_span() {
        let mut s = series("h", vec![1.0; 10]);
        s.hist.set_displayed_bins(3, 5);
        let r = s.display_x_range().unwrap();
        assert_relative_eq!(r.min, 2.0 - 0.03);
        assert_relative_eq!(r.max, 5.0 + 0.03);
    }

    #[test]
    fn y_range_spans_all_series() {
        let a = series("a", vec![2.0, 4.0]);
        let b = series("b", vec![1.0, 10.0]);
        let r = display_y_range("a", &[&a, &b], false).unwrap();
        assert_relative_eq!(r.min, 0.9);
        assert_relative_eq!(r.max, 12.0);
    }

    #[test]
    fn log_floor_sees_bins_outside_the_displayed_range() {
        let mut a = series("a", vec![0.01, 0.0, 5.0, 2.0]);
        a.hist.set_displayed_bins(2, 4);
        let r = display_y_range("a", &[&a], true).unwrap();
        assert_eq!(r.min, 0.005);
        assert_relative_eq!(r.max, 6.0);
    }

    #[test]
    fn y_range_rejects_nan() {
        let a = series("a", vec![f64::NAN, 1.0]);
        assert!(matches!(
            display_y_range("a", &[&a], false),
            Err(StyleError::NonFinite { what: "bin content", .. })
        ));
    }

    #[test]
    fn y_range_all_zero_uses_fallback() {
        let a = series("a", vec![0.0, 0.0]);
        let r = display_y_range("a", &[&a], false).unwrap();
        assert_relative_eq!(r.min, 5e-7);
        assert_relative_eq!(r.max, 1e-5);
    }

    #[test]
    fn frame_prefers_flag() {
        let mut plot = CompositePlot::new("p", CanvasSize::square(), PadStyle::default());
        plot.primitives.push(Primitive::Histogram(series("first", vec![1.0])));
        let mut framed = series("second", vec![1.0]);
        framed.frame = true;
        plot.primitives.push(Primitive::Histogram(framed));
        assert_eq!(plot.frame().map(|h| h.name()), Some("second"));
    }

    #[test]
    fn primitives_are_tagged() {
        let p = Primitive::Text(Annotation {
            x: 0.1,
            y: 0.2,
            text: "M_{a} = 500 GeV".into(),
            size: 20.0,
            anchor: TextAnchor::TopLeft,
        });
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["anchor"], "top_left");
        let back: Primitive = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
