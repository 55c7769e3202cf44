use hc_viz::Legend;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Draw an NDC legend box: one row per entry, a line swatch on the left
/// quarter and the label after it.
///
/// `scale` converts the legend's pixel sizes to canvas points.
pub fn draw_legend(canvas: &mut Canvas, legend: &Legend, scale: f64) {
    if legend.entries.is_empty() {
        return;
    }
    let (w, h) = (canvas.width, canvas.height);
    let (x1, y_bottom) = PlotArea::ndc_to_canvas(w, h, legend.x1, legend.y1);
    let (x2, y_top) = PlotArea::ndc_to_canvas(w, h, legend.x2, legend.y2);
    let box_w = (x2 - x1).abs();
    let box_h = (y_bottom - y_top).abs();
    let left = x1.min(x2);
    let top = y_top.min(y_bottom);

    let bg = Style {
        fill: Some(Color::WHITE),
        stroke: legend.border.then_some(Color::BLACK),
        stroke_width: 1.0,
    };
    canvas.rect(left, top, box_w, box_h, &bg);

    let row_h = box_h / legend.entries.len() as f64;
    let swatch_w = box_w * 0.25;
    let pad = box_w * 0.05;
    let text_style = TextStyle {
        size: legend.text_size * scale,
        baseline: TextBaseline::Central,
        ..Default::default()
    };

    for (i, entry) in legend.entries.iter().enumerate() {
        let cy = top + (i as f64 + 0.5) * row_h;
        let ls = LineStyle::solid(Color::hex(&entry.color), entry.line_width * scale);
        canvas.line(left + pad, cy, left + pad + swatch_w, cy, &ls);
        canvas.latex(left + 2.0 * pad + swatch_w, cy, &entry.label, &text_style);
    }
}
