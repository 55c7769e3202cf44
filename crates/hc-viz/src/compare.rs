//! Overlay one histogram name from three sources into a composite plot.

use std::path::{Path, PathBuf};

use hc_core::Hist1D;

use crate::config::ComparisonConfig;
use crate::container::{ContainerEntry, ContainerWriter};
use crate::error::Result;
use crate::plot::{
    Annotation, CompositePlot, HistogramSeries, Legend, LegendEntry, Primitive, display_y_range,
};
use crate::source::{HistogramSource, open_source};

/// Outcome of a comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareReport {
    /// Names written to the output container, in order.
    pub saved: Vec<String>,
    /// Names of the first source missing from another source.
    pub skipped: Vec<String>,
}

/// Compare every 1D histogram of `sources[0]` against the same name in the
/// other two sources and write one composite per name to `out`.
///
/// Names missing from any source are skipped with a warning.
pub fn compare_histograms(
    sources: [&dyn HistogramSource; 3],
    out: &mut ContainerWriter,
    cfg: &ComparisonConfig,
) -> Result<CompareReport> {
    cfg.validate()?;
    let mut report = CompareReport::default();

    for name in sources[0].histogram_names()? {
        let fetched = [
            sources[0].histogram(&name)?,
            sources[1].histogram(&name)?,
            sources[2].histogram(&name)?,
        ];
        let [Some(h1), Some(h2), Some(h3)] = fetched else {
            tracing::warn!("Skipping '{name}': not found in all files.");
            report.skipped.push(name);
            continue;
        };

        let plot = build_composite(&name, [h1, h2, h3], cfg)?;
        out.write_entry(ContainerEntry::Composite(plot));
        tracing::info!("Saved comparison for histogram '{name}'.");
        report.saved.push(name);
    }

    Ok(report)
}

/// Scale, style and lay out three copies of histogram `name`.
///
/// The frame series is drawn first; the others follow in input order.
pub fn build_composite(
    name: &str,
    hists: [Hist1D; 3],
    cfg: &ComparisonConfig,
) -> Result<CompositePlot> {
    let mut series: Vec<HistogramSeries> = hists
        .into_iter()
        .zip(cfg.scale_factors)
        .zip(&cfg.colors)
        .map(|((mut hist, factor), color)| {
            if hist.integral() != 0.0 {
                hist.scale(factor);
            }
            let mut s = HistogramSeries::new(hist, color.clone());
            s.show_stats = false;
            s
        })
        .collect();

    let y_range = {
        let refs: Vec<&HistogramSeries> = series.iter().collect();
        display_y_range(name, &refs, cfg.pad.log_y)?
    };
    let frame = &mut series[cfg.frame_series];
    let x_range = frame.display_x_range()?;
    frame.frame = true;
    frame.y_range = Some(y_range);
    frame.x_range = Some(x_range);
    frame.y_axis.title = cfg.y_title.clone();
    frame.y_axis.centered = true;
    frame.x_axis.centered = true;
    if let Some(label) = cfg.x_axis_labels.resolve(name) {
        frame.x_axis.title = label.to_string();
    }
    tracing::debug!(
        name,
        y_min = y_range.min,
        y_max = y_range.max,
        x_min = x_range.min,
        x_max = x_range.max,
        "comparison ranges"
    );

    let legend = Legend {
        x1: cfg.legend.x1,
        y1: cfg.legend.y1,
        x2: cfg.legend.x2,
        y2: cfg.legend.y2,
        border: false,
        text_size: cfg.legend.text_size,
        entries: series
            .iter()
            .zip(&cfg.legend_labels)
            .map(|(s, label)| LegendEntry {
                label: label.clone(),
                color: s.line_color.clone(),
                line_width: s.line_width,
            })
            .collect(),
    };

    let mut plot = CompositePlot::new(name, cfg.canvas, cfg.pad);
    let frame = series.remove(cfg.frame_series);
    plot.primitives.push(Primitive::Histogram(frame));
    plot.primitives.extend(series.into_iter().map(Primitive::Histogram));
    plot.primitives.extend(annotations(name, cfg).into_iter().map(Primitive::Text));
    plot.primitives.push(Primitive::Legend(legend));
    Ok(plot)
}

/// Particle label (if any) followed by the fixed parameter lines.
fn annotations(name: &str, cfg: &ComparisonConfig) -> Vec<Annotation> {
    let label = cfg.particle_labels.resolve(name);
    let positions = cfg.annotation.positions(label.is_some(), cfg.extra_params.len());
    label
        .into_iter()
        .chain(cfg.extra_params.iter().map(String::as_str))
        .zip(positions)
        .map(|(text, [x, y])| Annotation {
            x,
            y,
            text: text.to_string(),
            size: cfg.annotation.text_size,
            anchor: cfg.annotation.anchor,
        })
        .collect()
}

/// Open the three inputs, compare them into a fresh container at `output`.
pub fn run_comparison(
    inputs: &[PathBuf; 3],
    output: &Path,
    cfg: &ComparisonConfig,
) -> Result<CompareReport> {
    let s1 = open_source(&inputs[0])?;
    let s2 = open_source(&inputs[1])?;
    let s3 = open_source(&inputs[2])?;
    tracing::debug!(first = %s1.label(), second = %s2.label(), third = %s3.label(), "inputs opened");

    let mut out = ContainerWriter::create(output)?;
    let report = compare_histograms([s1.as_ref(), s2.as_ref(), s3.as_ref()], &mut out, cfg)?;
    out.close()?;
    Ok(report)
}
