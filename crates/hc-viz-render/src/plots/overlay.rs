//! Composite plot: histogram outlines over a shared frame, with free text
//! and a legend in NDC.

use hc_core::{AxisRange, Hist1D};
use hc_viz::{CompositePlot, HistogramSeries, Primitive, TextAnchor as NdcAnchor};

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::draw_legend;
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{AxisLabels, Frame, draw_axes};
use crate::primitives::*;

pub fn render(plot: &CompositePlot, config: &VizConfig) -> crate::Result<String> {
    let scale = config.figure.scale;
    let w = plot.canvas.width as f64 * scale;
    let h = plot.canvas.height as f64 * scale;
    let mut canvas = Canvas::new(w, h, &config.font.family)?.with_background(config.figure.background);
    let text_unit = w.min(h);

    if let Some(frame) = plot.frame() {
        let area = PlotArea::from_pad(w, h, &plot.pad)?;
        let (x_axis, y_axis) = frame_axes(plot, frame, config)?;

        draw_axes(
            &mut canvas,
            &area,
            &Frame {
                x_axis: &x_axis,
                y_axis: &y_axis,
                x: AxisLabels {
                    title: &frame.x_axis.title,
                    centered: frame.x_axis.centered,
                    title_offset: frame.x_axis.title_offset,
                    title_size: frame.x_axis.title_size * text_unit,
                    label_size: frame.x_axis.label_size * text_unit,
                },
                y: AxisLabels {
                    title: &frame.y_axis.title,
                    centered: frame.y_axis.centered,
                    title_offset: frame.y_axis.title_offset,
                    title_size: frame.y_axis.title_size * text_unit,
                    label_size: frame.y_axis.label_size * text_unit,
                },
                ticks_all_sides: plot.pad.ticks_all_sides,
            },
            config,
        );

        canvas.push_clip(area.left, area.top, area.width, area.height);
        for series in plot.histograms() {
            let points = outline(&series.hist, &x_axis, &y_axis, &area);
            let color = Color::hex(&series.line_color);
            canvas.polyline(&points, &LineStyle::solid(color, series.line_width * scale));
        }
        canvas.pop_clip();

        if let Some(stats) = plot.histograms().find(|s| s.show_stats) {
            draw_stats(&mut canvas, &area, &stats.hist, text_unit * 0.025);
        }

        let title = if frame.hist.title.is_empty() { &plot.title } else { &frame.hist.title };
        draw_title(&mut canvas, &area, title, config.font.title_size * text_unit);
    } else {
        tracing::debug!(plot = %plot.name, "composite has no histogram primitives; drawing text only");
        draw_title(&mut canvas, &PlotArea::from_pad(w, h, &plot.pad)?, &plot.title, config.font.title_size * text_unit);
    }

    for primitive in &plot.primitives {
        match primitive {
            Primitive::Text(t) => {
                let (x, y) = PlotArea::ndc_to_canvas(w, h, t.x, t.y);
                let baseline = match t.anchor {
                    NdcAnchor::BottomLeft => TextBaseline::Alphabetic,
                    NdcAnchor::TopLeft => TextBaseline::Hanging,
                };
                let style = TextStyle { size: t.size * scale, baseline, ..Default::default() };
                canvas.latex(x, y, &t.text, &style);
            }
            Primitive::Legend(legend) => draw_legend(&mut canvas, legend, scale),
            Primitive::Histogram(_) => {}
        }
    }

    Ok(canvas.finish_svg())
}

/// Axes of the frame series: its stored ranges, else ranges recomputed over
/// every series of the plot.
fn frame_axes(
    plot: &CompositePlot,
    frame: &HistogramSeries,
    config: &VizConfig,
) -> crate::Result<(Axis, Axis)> {
    let layout_err = |e: hc_viz::StyleError| RenderError::Layout(e.to_string());
    let x = match frame.x_range {
        Some(r) => r,
        None => frame.display_x_range().map_err(layout_err)?,
    };
    let y = match frame.y_range {
        Some(r) => r,
        None => {
            let all: Vec<&HistogramSeries> = plot.histograms().collect();
            hc_viz::plot::display_y_range(&plot.name, &all, plot.pad.log_y).map_err(layout_err)?
        }
    };
    check_range(&plot.name, "x", x, false)?;
    check_range(&plot.name, "y", y, plot.pad.log_y)?;

    let x_axis = Axis::linear(x.min, x.max, config.axes.target_ticks);
    let y_axis = if plot.pad.log_y {
        Axis::log(y.min, y.max)
    } else {
        Axis::linear(y.min, y.max, config.axes.target_ticks)
    };
    Ok((x_axis, y_axis))
}

fn check_range(name: &str, axis: &str, r: AxisRange, log: bool) -> crate::Result<()> {
    let ok = r.min.is_finite() && r.max.is_finite() && r.min < r.max && (!log || r.min > 0.0);
    if ok {
        Ok(())
    } else {
        Err(RenderError::Layout(format!(
            "plot '{name}': unusable {axis} range [{}, {}]{}",
            r.min,
            r.max,
            if log { " on a log axis" } else { "" }
        )))
    }
}

/// Step outline of every bin, rising from and falling back to the frame floor.
fn outline(hist: &Hist1D, x_axis: &Axis, y_axis: &Axis, area: &PlotArea) -> Vec<(f64, f64)> {
    let px = |x: f64| x_axis.data_to_pixel(x, area.left, area.right());
    let py = |y: f64| {
        let y = if y_axis.log && y <= 0.0 { y_axis.min } else { y };
        y_axis.data_to_pixel(y, area.bottom(), area.top)
    };
    let floor = py(y_axis.min);

    let mut points = Vec::with_capacity(2 * hist.n_bins() + 2);
    points.push((px(hist.x_min()), floor));
    for (i, &content) in hist.bin_content.iter().enumerate() {
        let y = py(content);
        points.push((px(hist.bin_edges[i]), y));
        points.push((px(hist.bin_edges[i + 1]), y));
    }
    points.push((px(hist.x_max()), floor));
    points
}

/// ROOT-style statistics box in the top-right corner of the frame.
fn draw_stats(canvas: &mut Canvas, area: &PlotArea, hist: &Hist1D, size: f64) {
    let (mean, std_dev) = moments(hist);
    let rows = [
        (hist.name.clone(), String::new()),
        ("Entries".to_string(), format!("{}", hist.entries)),
        ("Mean".to_string(), format!("{mean:.4}")),
        ("Std Dev".to_string(), format!("{std_dev:.4}")),
    ];
    let row_h = size * 1.4;
    let box_w = area.width * 0.25;
    let left = area.right() - box_w;
    let top = area.top;
    canvas.rect(left, top, box_w, row_h * rows.len() as f64, &Style {
        fill: Some(Color::WHITE),
        stroke: Some(Color::BLACK),
        stroke_width: 1.0,
    });
    for (i, (key, value)) in rows.iter().enumerate() {
        let y = top + (i as f64 + 0.5) * row_h;
        let base = TextStyle { size, baseline: TextBaseline::Central, ..Default::default() };
        if value.is_empty() {
            let style = TextStyle { anchor: TextAnchor::Middle, ..base };
            canvas.text(left + box_w / 2.0, y, key, &style);
        } else {
            canvas.text(left + size * 0.4, y, key, &base);
            canvas.text(left + box_w - size * 0.4, y, value, &TextStyle { anchor: TextAnchor::End, ..base });
        }
    }
}

/// Content-weighted mean and standard deviation of the bin centres.
fn moments(hist: &Hist1D) -> (f64, f64) {
    let (first, last) = hist.displayed_bins();
    let mut sw = 0.0;
    let mut swx = 0.0;
    let mut swx2 = 0.0;
    for bin in first..=last {
        let w = hist.bin_content[bin - 1];
        let x = 0.5 * (hist.bin_low_edge(bin) + hist.bin_up_edge(bin));
        sw += w;
        swx += w * x;
        swx2 += w * x * x;
    }
    if sw == 0.0 {
        return (0.0, 0.0);
    }
    let mean = swx / sw;
    (mean, (swx2 / sw - mean * mean).max(0.0).sqrt())
}

fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, size: f64) {
    if title.is_empty() {
        return;
    }
    let style = TextStyle {
        size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    canvas.latex(canvas.width / 2.0, (area.top / 2.0).max(size * 0.6), title, &style);
}
