use std::fmt::{self, Write as FmtWrite};

use crate::color::Color;
use crate::latex::{self, Shift, Span};
use crate::primitives::*;
use crate::text::{SCRIPT_SCALE, TextMetrics, measure_text};

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: Style,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: LineStyle,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        style: LineStyle,
    },
    Text {
        x: f64,
        y: f64,
        spans: Vec<Span>,
        style: TextStyle,
        rotate: Option<f64>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        style: Style,
    },
    Group {
        clip_id: String,
        children: Vec<SvgElement>,
    },
}

/// Immediate-mode SVG canvas. Coordinates in points, origin top-left.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    font_family: String,
    background: Color,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_stack: Vec<String>,
    next_clip_id: usize,
}

impl Canvas {
    pub fn new(width: f64, height: f64, font_family: impl Into<String>) -> crate::Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(crate::RenderError::Layout(format!(
                "canvas size {width}x{height} is not positive"
            )));
        }
        Ok(Self {
            width,
            height,
            font_family: font_family.into(),
            background: Color::WHITE,
            elements: Vec::new(),
            defs: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
        })
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.push(SvgElement::Rect { x, y, w, h, style: style.clone() });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    /// Plain text, drawn verbatim.
    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        let spans = vec![Span { text: content.to_string(), shift: Shift::Normal }];
        self.push(SvgElement::Text { x, y, spans, style: style.clone(), rotate: None });
    }

    /// TLatex markup, drawn with sub/superscript runs.
    pub fn latex(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.latex_rotated(x, y, content, style, None);
    }

    pub fn latex_rotated(
        &mut self,
        x: f64,
        y: f64,
        content: &str,
        style: &TextStyle,
        rotate: Option<f64>,
    ) {
        let spans = latex::parse(content);
        if spans.is_empty() {
            return;
        }
        self.push(SvgElement::Text { x, y, spans, style: style.clone(), rotate });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.push(SvgElement::Circle { cx, cy, r, style: style.clone() });
    }

    /// Data marker centred on `(x, y)`.
    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        let style = if marker.fill {
            Style { fill: Some(marker.color), stroke: Some(marker.color), stroke_width: 0.5 }
        } else {
            Style { fill: None, stroke: Some(marker.color), stroke_width: 1.0 }
        };
        match marker.shape {
            MarkerShape::Circle => self.circle(x, y, marker.size, &style),
            MarkerShape::Square => {
                let s = marker.size;
                self.rect(x - s, y - s, 2.0 * s, 2.0 * s, &style);
            }
        }
    }

    // --- Clip paths ---

    /// Clip everything drawn until the matching [`Canvas::pop_clip`] to a rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        self.defs.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.clip_stack.push(id.clone());
        id
    }

    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_text(content, style)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        let Some(clip_id) = self.clip_stack.last() else {
            self.elements.push(elem);
            return;
        };
        if let Some(SvgElement::Group { clip_id: last, children }) = self.elements.last_mut()
            && *last == *clip_id
        {
            children.push(elem);
            return;
        }
        self.elements.push(SvgElement::Group { clip_id: clip_id.clone(), children: vec![elem] });
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(32 * 1024);
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;

        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for d in &self.defs {
                writeln!(out, "{d}")?;
            }
            out.push_str("</defs>\n");
        }

        writeln!(
            out,
            r#"<rect width="{}" height="{}" fill="{}" />"#,
            self.width,
            self.height,
            self.background.to_svg_fill()
        )?;

        for elem in &self.elements {
            self.render_element(out, elem)?;
        }

        out.push_str("</svg>\n");
        Ok(())
    }

    fn render_element(&self, out: &mut String, elem: &SvgElement) -> fmt::Result {
        match elem {
            SvgElement::Rect { x, y, w, h, style } => {
                write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
                write_style_attrs(out, style)?;
                out.push_str(" />\n");
            }
            SvgElement::Line { x1, y1, x2, y2, style } => {
                write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
                write_line_attrs(out, style)?;
                out.push_str(" />\n");
            }
            SvgElement::Polyline { points, style } => {
                out.push_str(r#"<polyline points=""#);
                for (i, (x, y)) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    write!(out, "{x:.2},{y:.2}")?;
                }
                out.push_str(r#"" fill="none""#);
                write_line_attrs(out, style)?;
                out.push_str(r#" stroke-linejoin="miter" />"#);
                out.push('\n');
            }
            SvgElement::Text { x, y, spans, style, rotate } => {
                write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
                write!(
                    out,
                    r#" font-family="{}" font-size="{:.1}""#,
                    self.font_family, style.size
                )?;
                write!(out, r#" fill="{}""#, style.color.to_svg_fill())?;
                write!(out, r#" text-anchor="{}""#, style.anchor.as_str())?;
                write!(out, r#" dominant-baseline="{}""#, style.baseline.as_str())?;
                if style.bold {
                    out.push_str(r#" font-weight="bold""#);
                }
                if let Some(angle) = rotate {
                    write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
                }
                out.push('>');
                for span in spans {
                    match span.shift {
                        Shift::Normal => escape_into(out, &span.text),
                        Shift::Sub | Shift::Super => {
                            let shift = if span.shift == Shift::Sub { "sub" } else { "super" };
                            write!(
                                out,
                                r#"<tspan baseline-shift="{shift}" font-size="{:.1}">"#,
                                style.size * SCRIPT_SCALE
                            )?;
                            escape_into(out, &span.text);
                            out.push_str("</tspan>");
                        }
                    }
                }
                out.push_str("</text>\n");
            }
            SvgElement::Circle { cx, cy, r, style } => {
                write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
                write_style_attrs(out, style)?;
                out.push_str(" />\n");
            }
            SvgElement::Group { clip_id, children } => {
                writeln!(out, r#"<g clip-path="url(#{clip_id})">"#)?;
                for child in children {
                    self.render_element(out, child)?;
                }
                out.push_str("</g>\n");
            }
        }
        Ok(())
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_style_attrs(out: &mut String, style: &Style) -> fmt::Result {
    match &style.fill {
        Some(fill) => write!(out, r#" fill="{}""#, fill.to_svg_fill())?,
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &style.stroke {
        write!(out, r#" stroke="{}""#, stroke.to_svg_fill())?;
        write!(out, r#" stroke-width="{:.2}""#, style.stroke_width)?;
    }
    Ok(())
}

fn write_line_attrs(out: &mut String, style: &LineStyle) -> fmt::Result {
    write!(out, r#" stroke="{}""#, style.color.to_svg_fill())?;
    write!(out, r#" stroke-width="{:.2}""#, style.width)?;
    Ok(())
}
