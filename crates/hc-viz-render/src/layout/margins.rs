use hc_viz::{Margins, PadStyle};

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Frame inside NDC `margins` of a `canvas_w` × `canvas_h` canvas.
    pub fn from_margins(canvas_w: f64, canvas_h: f64, margins: &Margins) -> crate::Result<Self> {
        let m = margins;
        if [m.left, m.right, m.top, m.bottom].iter().any(|v| !(0.0..1.0).contains(v))
            || m.left + m.right >= 1.0
            || m.top + m.bottom >= 1.0
        {
            return Err(crate::RenderError::Layout(format!(
                "margins L/R/T/B {}/{}/{}/{} leave no frame",
                m.left, m.right, m.top, m.bottom
            )));
        }
        Ok(Self {
            left: m.left * canvas_w,
            top: m.top * canvas_h,
            width: (1.0 - m.left - m.right) * canvas_w,
            height: (1.0 - m.top - m.bottom) * canvas_h,
        })
    }

    /// Frame of a pad; a fixed-aspect pad gets the largest centred square.
    pub fn from_pad(canvas_w: f64, canvas_h: f64, pad: &PadStyle) -> crate::Result<Self> {
        let area = Self::from_margins(canvas_w, canvas_h, &pad.margins)?;
        if !pad.fixed_aspect {
            return Ok(area);
        }
        let side = area.width.min(area.height);
        Ok(Self {
            left: area.left + (area.width - side) / 2.0,
            top: area.top + (area.height - side) / 2.0,
            width: side,
            height: side,
        })
    }

    /// Canvas point of an NDC coordinate (origin bottom-left).
    pub fn ndc_to_canvas(canvas_w: f64, canvas_h: f64, x: f64, y: f64) -> (f64, f64) {
        (x * canvas_w, (1.0 - y) * canvas_h)
    }
}
