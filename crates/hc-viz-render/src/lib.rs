//! # hc-viz-render
//!
//! Draws hepcmp plot artifacts on an in-tree SVG canvas and converts the
//! result to PNG (resvg/tiny-skia) or PDF (svg2pdf). Comparison pages are
//! collected into one PDF by [`output::pdf::MultiPageDocument`], which is the
//! [`hc_viz::PageSink`] of the post-processor.

pub mod canvas;
pub mod color;
pub mod config;
pub mod latex;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use std::path::{Path, PathBuf};

use config::VizConfig;
use hc_viz::CurveArtifact;
use thiserror::Error;

#[cfg(feature = "pdf")]
pub use output::pdf::MultiPageDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert an SVG drawing to bytes in `format` (`svg`, `png`, `pdf`).
pub fn svg_to_bytes(svg: String, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&svg),
        other => {
            let _ = config;
            Err(RenderError::UnsupportedFormat(other.to_string()))
        }
    }
}

/// Write an SVG drawing to `path`, format inferred from the extension.
pub fn save(svg: String, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = svg_to_bytes(svg, ext, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Render the sweep curve once and save it as `<dir>/<stem>.<ext>` for every
/// extension, returning the written paths in order.
pub fn save_curve(
    artifact: &CurveArtifact,
    dir: &Path,
    extensions: &[&str],
    config: &VizConfig,
) -> Result<Vec<PathBuf>> {
    let svg = plots::curve::render(artifact, config)?;
    let mut written = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let path = dir.join(format!("{}.{ext}", artifact.style.output_stem));
        save(svg.clone(), &path, config)?;
        tracing::debug!(path = %path.display(), "saved curve");
        written.push(path);
    }
    Ok(written)
}
