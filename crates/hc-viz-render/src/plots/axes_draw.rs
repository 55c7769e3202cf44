use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Title and text sizes of one axis, in canvas points.
#[derive(Debug, Clone)]
pub struct AxisLabels<'a> {
    pub title: &'a str,
    pub centered: bool,
    pub title_offset: f64,
    pub title_size: f64,
    pub label_size: f64,
}

/// Everything needed to draw a box frame.
pub struct Frame<'a> {
    pub x_axis: &'a Axis,
    pub y_axis: &'a Axis,
    pub x: AxisLabels<'a>,
    pub y: AxisLabels<'a>,
    /// Mirror ticks on the top and right edges.
    pub ticks_all_sides: bool,
}

/// Draw a box frame with ticks, tick labels and axis titles.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, frame: &Frame<'_>, config: &VizConfig) {
    let frame_color = Color::BLACK;
    let frame_style = LineStyle::solid(frame_color, config.axes.line_width);
    let tick_style = LineStyle::solid(frame_color, config.axes.line_width * 0.75);

    let inward = config.axes.tick_direction == "in";
    let dir = if inward { 1.0 } else { -1.0 };
    let x_tl = config.axes.tick_length * area.height;
    let x_mtl = config.axes.minor_tick_length * area.height;
    let y_tl = config.axes.tick_length * area.width;
    let y_mtl = config.axes.minor_tick_length * area.width;

    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    // --- X axis ticks ---
    let x_ticks = frame.x_axis.tick_positions.iter().map(|&v| (v, x_tl));
    let x_minor = frame.x_axis.minor_ticks.iter().map(|&v| (v, x_mtl));
    for (val, len) in x_ticks.chain(x_minor) {
        let px = frame.x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() - dir * len, &tick_style);
        if frame.ticks_all_sides {
            canvas.line(px, area.top, px, area.top + dir * len, &tick_style);
        }
    }

    let x_label_style = TextStyle {
        size: frame.x.label_size,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    let x_label_y = area.bottom() + frame.x.label_size * 0.5 + if inward { 0.0 } else { x_tl };
    for (val, label) in frame.x_axis.tick_positions.iter().zip(&frame.x_axis.tick_labels) {
        let px = frame.x_axis.data_to_pixel(*val, area.left, area.right());
        canvas.text(px, x_label_y, label, &x_label_style);
    }

    // --- Y axis ticks ---
    let y_ticks = frame.y_axis.tick_positions.iter().map(|&v| (v, y_tl));
    let y_minor = frame.y_axis.minor_ticks.iter().map(|&v| (v, y_mtl));
    for (val, len) in y_ticks.chain(y_minor) {
        let py = frame.y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left + dir * len, py, &tick_style);
        if frame.ticks_all_sides {
            canvas.line(area.right(), py, area.right() - dir * len, py, &tick_style);
        }
    }

    let y_label_style = TextStyle {
        size: frame.y.label_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let y_label_x = area.left - frame.y.label_size * 0.5 - if inward { 0.0 } else { y_tl };
    let mut widest = 0.0_f64;
    for (val, label) in frame.y_axis.tick_positions.iter().zip(&frame.y_axis.tick_labels) {
        let py = frame.y_axis.data_to_pixel(*val, area.bottom(), area.top);
        canvas.text(y_label_x, py, label, &y_label_style);
        widest = widest.max(canvas.measure_text(label, &y_label_style).width);
    }

    // --- Axis titles ---
    if !frame.x.title.is_empty() {
        let (x, anchor) = if frame.x.centered {
            (area.left + area.width / 2.0, TextAnchor::Middle)
        } else {
            (area.right(), TextAnchor::End)
        };
        let y = x_label_y
            + frame.x.label_size
            + frame.x.title_offset * frame.x.title_size * 1.2;
        let style = TextStyle { size: frame.x.title_size, anchor, ..Default::default() };
        canvas.latex(x.min(canvas.width), y.min(canvas.height - 2.0), frame.x.title, &style);
    }

    if !frame.y.title.is_empty() {
        let (y, anchor) = if frame.y.centered {
            (area.top + area.height / 2.0, TextAnchor::Middle)
        } else {
            (area.top, TextAnchor::End)
        };
        let x = y_label_x - widest - frame.y.title_offset * frame.y.title_size * 0.8;
        let style = TextStyle { size: frame.y.title_size, anchor, ..Default::default() };
        canvas.latex_rotated(x.max(frame.y.title_size), y, frame.y.title, &style, Some(-90.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(title: &str, centered: bool) -> AxisLabels<'_> {
        AxisLabels { title, centered, title_offset: 1.0, title_size: 14.0, label_size: 12.0 }
    }

    fn draw(ticks_all_sides: bool) -> String {
        let mut canvas = Canvas::new(400.0, 400.0, "sans-serif").unwrap();
        let area = PlotArea { left: 40.0, top: 40.0, width: 320.0, height: 320.0 };
        let x_axis = Axis::linear(0.0, 10.0, 6);
        let y_axis = Axis::log(0.01, 100.0);
        let frame = Frame {
            x_axis: &x_axis,
            y_axis: &y_axis,
            x: labels("p_{t} [GeV]", true),
            y: labels("Number of Events", false),
            ticks_all_sides,
        };
        draw_axes(&mut canvas, &area, &frame, &VizConfig::default());
        canvas.finish_svg()
    }

    #[test]
    fn mirrored_ticks_double_the_tick_lines() {
        let one_side = draw(false).matches("<line").count();
        let all_sides = draw(true).matches("<line").count();
        // 4 frame edges + every tick once or twice
        assert_eq!(all_sides - 4, 2 * (one_side - 4));
    }

    #[test]
    fn titles_and_labels_are_drawn() {
        let svg = draw(true);
        assert!(svg.contains(r#"<tspan baseline-shift="sub""#));
        assert!(svg.contains("Number of Events"));
        assert!(svg.contains("rotate(-90.0"));
        assert!(svg.contains(">10²</text>"));
        assert!(svg.contains(">10</text>"));
    }
}
