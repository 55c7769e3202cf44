use hc_core::AxisRange;
use hc_viz::{CurveArtifact, Margins};

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{AxisLabels, Frame, draw_axes};
use crate::primitives::*;

/// Axes, line through the points in order, and a marker on every point.
pub fn render(artifact: &CurveArtifact, config: &VizConfig) -> crate::Result<String> {
    if artifact.x.is_empty() || artifact.x.len() != artifact.y.len() {
        return Err(RenderError::Layout(format!(
            "curve '{}' needs matching non-empty x/y ({} vs {} values)",
            artifact.title,
            artifact.x.len(),
            artifact.y.len()
        )));
    }
    if artifact.x.iter().chain(&artifact.y).any(|v| !v.is_finite()) {
        return Err(RenderError::Layout(format!("curve '{}' has non-finite points", artifact.title)));
    }

    let style = &artifact.style;
    let scale = config.figure.scale;
    let w = style.canvas.width as f64 * scale;
    let h = style.canvas.height as f64 * scale;
    let mut canvas = Canvas::new(w, h, &config.font.family)?.with_background(config.figure.background);
    let text_unit = w.min(h);

    let (x_lo, x_hi) = artifact.x_bounds();
    let (y_lo, y_hi) = artifact.y_bounds();
    let x = graph_range(x_lo, x_hi, false);
    let y = graph_range(y_lo, y_hi, true);
    let x_axis = Axis::linear(x.min, x.max, config.axes.target_ticks);
    let y_axis = Axis::linear(y.min, y.max, config.axes.target_ticks);

    let area = PlotArea::from_margins(w, h, &Margins::default())?;
    draw_axes(
        &mut canvas,
        &area,
        &Frame {
            x_axis: &x_axis,
            y_axis: &y_axis,
            x: default_labels(&artifact.x_title, config, text_unit),
            y: default_labels(&artifact.y_title, config, text_unit),
            ticks_all_sides: false,
        },
        config,
    );

    let points: Vec<(f64, f64)> = artifact
        .x
        .iter()
        .zip(&artifact.y)
        .map(|(&x, &y)| {
            (
                x_axis.data_to_pixel(x, area.left, area.right()),
                y_axis.data_to_pixel(y, area.bottom(), area.top),
            )
        })
        .collect();

    canvas.push_clip(area.left, area.top, area.width, area.height);
    canvas.polyline(&points, &LineStyle::solid(Color::hex(&style.line_color), scale));
    let marker = MarkerStyle::from_root(
        style.marker_style,
        style.marker_size * scale,
        Color::hex(&style.marker_color),
    );
    for &(px, py) in &points {
        canvas.marker(px, py, &marker);
    }
    canvas.pop_clip();

    let title_style = TextStyle {
        size: config.font.title_size * text_unit,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    canvas.latex(w / 2.0, area.top / 2.0, &artifact.title, &title_style);

    Ok(canvas.finish_svg())
}

fn default_labels<'a>(title: &'a str, config: &VizConfig, text_unit: f64) -> AxisLabels<'a> {
    AxisLabels {
        title,
        centered: false,
        title_offset: 1.0,
        title_size: config.font.axis_title_size * text_unit,
        label_size: config.font.axis_label_size * text_unit,
    }
}

/// Graph frame range: the data span widened by 10% on each side; a
/// non-negative y span is not pushed below zero.
fn graph_range(lo: f64, hi: f64, clamp_at_zero: bool) -> AxisRange {
    let mut d = 0.1 * (hi - lo);
    if d == 0.0 {
        d = if lo == 0.0 { 1.0 } else { 0.1 * lo.abs() };
    }
    let mut min = lo - d;
    if clamp_at_zero && lo >= 0.0 && min < 0.0 {
        min = 0.0;
    }
    AxisRange::new(min, hi + d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hc_core::{DataPoint, DataSeries};
    use hc_viz::CurveStyle;
    use std::path::Path;

    fn artifact(points: &[(f64, f64)]) -> CurveArtifact {
        let series = DataSeries::new(
            points.iter().map(|&(x, y)| DataPoint::new(x, y)).collect(),
            Path::new("x_section.txt"),
        )
        .unwrap();
        CurveArtifact::from_series(&series, &CurveStyle::default())
    }

    #[test]
    fn renders_line_markers_and_titles() {
        let svg = render(&artifact(&[(10.0, 0.5), (20.0, 1.2), (30.0, 2.0)]), &VizConfig::default())
            .unwrap();
        assert!(svg.contains(r#"width="800" height="600""#));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(r##"fill="#0000ff" stroke="#0000ff""##));
        assert!(svg.contains("Cross section vs Mxd (mh2=mh3=mhc=700 GeV)"));
        assert!(svg.contains(">Mxd</text>"));
        assert!(svg.contains(">Weight [pb]</text>"));
    }

    #[test]
    fn single_point_gets_a_frame() {
        let svg = render(&artifact(&[(10.0, 0.5)]), &VizConfig::default()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn graph_range_padding() {
        let r = graph_range(10.0, 30.0, false);
        assert_relative_eq!(r.min, 8.0);
        assert_relative_eq!(r.max, 32.0);
        let r = graph_range(0.5, 20.0, true);
        assert_eq!(r.min, 0.0);
        let r = graph_range(-1.0, 1.0, true);
        assert_relative_eq!(r.min, -1.2);
        let r = graph_range(5.0, 5.0, false);
        assert_relative_eq!(r.min, 4.5);
        assert_relative_eq!(r.max, 5.5);
        let r = graph_range(0.0, 0.0, true);
        assert_eq!((r.min, r.max), (0.0, 1.0));
    }

    #[test]
    fn mismatched_or_nan_points_fail() {
        let mut art = artifact(&[(10.0, 0.5), (20.0, 1.2)]);
        art.y.pop();
        assert!(matches!(render(&art, &VizConfig::default()), Err(RenderError::Layout(_))));
        let mut art = artifact(&[(10.0, 0.5)]);
        art.y[0] = f64::NAN;
        assert!(render(&art, &VizConfig::default()).is_err());
    }
}
