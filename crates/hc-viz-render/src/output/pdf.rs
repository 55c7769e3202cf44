//! Single-page conversion and the multi-page comparison document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hc_viz::{CompositePlot, PageSink, VizError};
use pdf_writer::{Chunk, Content, Finish, Name, Pdf, Rect, Ref};

use crate::RenderError;
use crate::config::VizConfig;

/// Convert SVG string to PDF bytes.
pub fn svg_to_pdf(svg: &str) -> crate::Result<Vec<u8>> {
    let opt = super::svg_options();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Pdf(e.to_string()))?;

    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

struct Page {
    chunk: Chunk,
    xobject: Ref,
    width: f32,
    height: f32,
}

/// A PDF assembled one page at a time.
///
/// [`create`](Self::create) truncates the target file; pages are held in
/// memory and the document is written by [`close`](Self::close). Dropping the
/// document without closing it leaves the empty file behind.
pub struct MultiPageDocument {
    path: PathBuf,
    config: VizConfig,
    options: usvg::Options<'static>,
    pages: Vec<Page>,
}

impl MultiPageDocument {
    pub fn create(path: impl Into<PathBuf>, config: &VizConfig) -> crate::Result<Self> {
        let path = path.into();
        std::fs::File::create(&path)?;
        tracing::debug!(path = %path.display(), "opened multi-page document");
        Ok(Self { path, config: config.clone(), options: super::svg_options(), pages: Vec::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append one SVG drawing as the next page, sized to the drawing.
    pub fn add_svg(&mut self, svg: &str) -> crate::Result<()> {
        let tree =
            usvg::Tree::from_str(svg, &self.options).map_err(|e| RenderError::Pdf(e.to_string()))?;
        let (chunk, xobject) = svg2pdf::to_chunk(&tree, svg2pdf::ConversionOptions::default())
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let size = tree.size();
        self.pages.push(Page { chunk, xobject, width: size.width(), height: size.height() });
        Ok(())
    }

    /// Render `plot` and append it as the next page.
    pub fn add_plot(&mut self, plot: &CompositePlot) -> crate::Result<()> {
        let svg = crate::plots::overlay::render(plot, &self.config)?;
        self.add_svg(&svg)
    }

    /// Write every page to the file and return its path.
    pub fn close(self) -> crate::Result<PathBuf> {
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();

        struct Placed {
            page_id: Ref,
            content_id: Ref,
            xobject: Ref,
            width: f32,
            height: f32,
        }

        let mut placed = Vec::with_capacity(self.pages.len());
        let mut chunks = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let mut map = HashMap::new();
            let chunk = page.chunk.renumber(|old| *map.entry(old).or_insert_with(|| alloc.bump()));
            let xobject = map
                .get(&page.xobject)
                .copied()
                .ok_or_else(|| RenderError::Pdf("page drawing lost during renumbering".into()))?;
            placed.push(Placed {
                page_id: alloc.bump(),
                content_id: alloc.bump(),
                xobject,
                width: page.width,
                height: page.height,
            });
            chunks.push(chunk);
        }

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id).kids(placed.iter().map(|p| p.page_id)).count(placed.len() as i32);

        let drawing = Name(b"P1");
        for p in &placed {
            let mut page = pdf.page(p.page_id);
            page.media_box(Rect::new(0.0, 0.0, p.width, p.height));
            page.parent(tree_id);
            page.contents(p.content_id);
            page.resources().x_objects().pair(drawing, p.xobject);
            page.finish();

            // the drawing is a unit-square form; scale it to the page
            let mut content = Content::new();
            content.save_state();
            content.transform([p.width, 0.0, 0.0, p.height, 0.0, 0.0]);
            content.x_object(drawing);
            content.restore_state();
            let data = content.finish();
            pdf.stream(p.content_id, &data);
        }
        for chunk in &chunks {
            pdf.extend(chunk);
        }

        std::fs::write(&self.path, pdf.finish())?;
        tracing::debug!(path = %self.path.display(), pages = placed.len(), "wrote multi-page document");
        Ok(self.path)
    }
}

impl PageSink for MultiPageDocument {
    fn add_page(&mut self, plot: &CompositePlot) -> hc_viz::Result<()> {
        self.add_plot(plot)
            .map_err(|e| VizError::Page(format!("page '{}': {e}", plot.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::color::Color;
    use crate::primitives::Style;

    fn tmp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("hc_render_{name}_{nanos}.pdf"))
    }

    fn svg(w: f64, h: f64) -> String {
        let mut c = Canvas::new(w, h, "sans-serif").unwrap();
        c.rect(10.0, 10.0, 20.0, 20.0, &Style::filled(Color::rgb(0, 0, 255)));
        c.finish_svg()
    }

    #[test]
    fn single_page_is_a_pdf() {
        let pdf = svg_to_pdf(&svg(100.0, 50.0)).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn pages_are_written_on_close() {
        let path = tmp_path("multi");
        let mut doc = MultiPageDocument::create(&path, &VizConfig::default()).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        doc.add_svg(&svg(800.0, 800.0)).unwrap();
        doc.add_svg(&svg(800.0, 600.0)).unwrap();
        doc.add_svg(&svg(800.0, 800.0)).unwrap();
        assert_eq!(doc.len(), 3);
        let written = doc.close().unwrap();
        assert_eq!(written, path);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 3"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_document_still_closes() {
        let path = tmp_path("empty");
        let doc = MultiPageDocument::create(&path, &VizConfig::default()).unwrap();
        assert!(doc.is_empty());
        doc.close().unwrap();
        assert!(String::from_utf8_lossy(&std::fs::read(&path).unwrap()).contains("/Count 0"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_target_fails_on_create() {
        let path = std::env::temp_dir().join("hc_render_no_such_dir").join("x.pdf");
        assert!(matches!(
            MultiPageDocument::create(&path, &VizConfig::default()),
            Err(RenderError::Io(_))
        ));
    }
}
