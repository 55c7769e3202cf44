use crate::latex::{self, Shift};
use crate::primitives::TextStyle;

/// Relative size of sub/superscript runs.
pub const SCRIPT_SCALE: f64 = 0.7;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Estimate the extent of TLatex text from per-character advance classes
/// of a Helvetica-like face.
///
/// Used for layout only (legend boxes, margins); the rasterizer does the
/// actual shaping.
pub fn measure_text(content: &str, style: &TextStyle) -> TextMetrics {
    let mut width = 0.0;
    for span in latex::parse(content) {
        let size = match span.shift {
            Shift::Normal => style.size,
            Shift::Sub | Shift::Super => style.size * SCRIPT_SCALE,
        };
        width += span.text.chars().map(advance).sum::<f64>() * size;
    }
    if style.bold {
        width *= 1.06;
    }
    TextMetrics { width, height: style.size * 1.15, ascent: style.size * 0.72 }
}

fn advance(c: char) -> f64 {
    match c {
        '\u{0300}'..='\u{036F}' | '\u{20D0}'..='\u{20FF}' => 0.0,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.22,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' => 0.3,
        'm' | 'w' | 'M' | 'W' => 0.83,
        '0'..='9' => 0.556,
        c if c.is_uppercase() => 0.667,
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn width_scales_with_size() {
        let small = measure_text("Hello", &TextStyle { size: 10.0, ..Default::default() });
        let large = measure_text("Hello", &TextStyle { size: 20.0, ..Default::default() });
        assert!(small.width > 20.0);
        assert_relative_eq!(large.width, 2.0 * small.width);
        assert!(small.ascent > 0.0 && small.height > small.ascent);
    }

    #[test]
    fn scripts_are_narrower_than_inline() {
        let style = TextStyle::default();
        let inline = measure_text("Mchi", &style);
        let sub = measure_text("M_{chi}", &style);
        assert!(sub.width < inline.width);
        assert_relative_eq!(measure_text("#eta", &style).width, 5.0);
    }

    #[test]
    fn bold_is_wider() {
        let r = measure_text("Test", &TextStyle::default());
        let b = measure_text("Test", &TextStyle { bold: true, ..Default::default() });
        assert!(b.width > r.width);
    }
}
