use crate::RenderError;

/// Convert SVG string to PNG bytes at the given DPI (72 = one pixel per point).
pub fn svg_to_png(svg: &str, dpi: u32) -> crate::Result<Vec<u8>> {
    if dpi == 0 {
        return Err(RenderError::Png("dpi must be positive".into()));
    }
    let opt = super::svg_options();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Png(e.to_string()))?;

    let scale = dpi as f32 / 72.0;
    let size = tree.size();
    let w = (size.width() * scale).ceil() as u32;
    let h = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| RenderError::Png(format!("cannot allocate a {w}x{h} pixmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| RenderError::Png(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::color::Color;
    use crate::primitives::Style;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn svg() -> String {
        let mut c = Canvas::new(80.0, 60.0, "sans-serif").unwrap();
        c.rect(10.0, 10.0, 20.0, 20.0, &Style::filled(Color::rgb(255, 0, 0)));
        c.finish_svg()
    }

    fn dimensions(png: &[u8]) -> (u32, u32) {
        let be = |i: usize| u32::from_be_bytes([png[i], png[i + 1], png[i + 2], png[i + 3]]);
        (be(16), be(20))
    }

    #[test]
    fn dpi_scales_the_raster() {
        let png = svg_to_png(&svg(), 72).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        assert_eq!(dimensions(&png), (80, 60));
        let png = svg_to_png(&svg(), 144).unwrap();
        assert_eq!(dimensions(&png), (160, 120));
    }

    #[test]
    fn bad_input_is_a_png_error() {
        assert!(matches!(svg_to_png("<not svg", 72), Err(RenderError::Png(_))));
        assert!(matches!(svg_to_png(&svg(), 0), Err(RenderError::Png(_))));
    }
}
