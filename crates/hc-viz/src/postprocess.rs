//! Second pass over a comparison container: restyle every histogram primitive
//! and emit one page per composite.

use std::path::Path;

use crate::config::PostProcessStyle;
use crate::container::{ContainerEntry, ContainerWriter, PlotContainer};
use crate::error::{Result, StyleError};
use crate::plot::{CompositePlot, HistogramSeries, PadStyle, Primitive, display_y_range};

/// Receives one rendered page per composite plot.
///
/// Opening and closing the underlying document is up to the owner of the sink.
pub trait PageSink {
    /// Append `plot` as the next page.
    fn add_page(&mut self, plot: &CompositePlot) -> Result<()>;
}

/// Outcome of a post-processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessReport {
    /// Pages handed to the sink.
    pub pages: usize,
    /// Histogram primitives restyled.
    pub restyled: usize,
    /// Styling steps that failed and were skipped.
    pub style_failures: usize,
}

/// Restyle every composite of `input`, write it to `out` and add it to `sink`.
///
/// Raw histogram entries are not copied. Styling failures are logged and
/// counted; container and sink failures abort the run.
pub fn postprocess(
    input: &PlotContainer,
    out: &mut ContainerWriter,
    sink: &mut dyn PageSink,
    style: &PostProcessStyle,
) -> Result<PostProcessReport> {
    let mut report = PostProcessReport::default();

    for composite in input.composites() {
        let mut plot = composite.clone();
        let (restyled, failures) = restyle_composite(&mut plot, style);
        report.restyled += restyled;
        report.style_failures += failures.len();

        sink.add_page(&plot)?;
        report.pages += 1;
        out.write_entry(ContainerEntry::Composite(plot));
    }

    Ok(report)
}

/// Apply `style` to every histogram primitive of `plot`.
///
/// Returns the number of primitives touched and the failed steps.
pub fn restyle_composite(
    plot: &mut CompositePlot,
    style: &PostProcessStyle,
) -> (usize, Vec<StyleError>) {
    let pad = plot.pad;
    let mut restyled = 0;
    let mut failures = Vec::new();
    for series in plot.histograms_mut() {
        failures.extend(restyle_histogram(series, &pad, style));
        restyled += 1;
    }
    if restyled > 0 {
        plot.canvas = style.canvas;
        plot.title = style.page_title.clone();
        // legend lines follow the series they describe
        for p in &mut plot.primitives {
            if let Primitive::Legend(legend) = p {
                for entry in &mut legend.entries {
                    entry.line_width = style.line_width;
                }
            }
        }
    }
    (restyled, failures)
}

/// Run every styling step on one primitive; a failing step does not stop the others.
pub fn restyle_histogram(
    series: &mut HistogramSeries,
    pad: &PadStyle,
    style: &PostProcessStyle,
) -> Vec<StyleError> {
    let steps: [(&str, Step); 5] = [
        ("axis titles", set_axis_titles),
        ("sizes", set_sizes),
        ("y range", set_y_range),
        ("x range", set_x_range),
        ("title", set_title),
    ];

    let mut failures = Vec::new();
    for (step, apply) in steps {
        if let Err(e) = apply(series, pad, style) {
            tracing::warn!(histogram = series.name(), step, "styling step failed: {e}");
            failures.push(e);
        }
    }
    failures
}

type StepResult = std::result::Result<(), StyleError>;
type Step = fn(&mut HistogramSeries, &PadStyle, &PostProcessStyle) -> StepResult;

fn set_axis_titles(s: &mut HistogramSeries, _: &PadStyle, style: &PostProcessStyle) -> StepResult {
    s.y_axis.title = style.y_title.clone();
    s.y_axis.centered = true;
    s.x_axis.centered = true;
    if let Some(label) = style.x_axis_labels.resolve(&s.hist.name) {
        s.x_axis.title = label.to_string();
    }
    Ok(())
}

fn set_sizes(s: &mut HistogramSeries, _: &PadStyle, style: &PostProcessStyle) -> StepResult {
    s.x_axis.title_offset = style.x_title_offset;
    s.y_axis.title_offset = style.y_title_offset;
    s.x_axis.label_size = style.label_size;
    s.y_axis.label_size = style.label_size;
    s.x_axis.title_size = style.title_size;
    s.y_axis.title_size = style.title_size;
    s.line_width = style.line_width;
    Ok(())
}

fn set_y_range(s: &mut HistogramSeries, pad: &PadStyle, _: &PostProcessStyle) -> StepResult {
    let range = display_y_range(s.name(), &[&*s], pad.log_y)?;
    s.y_range = Some(range);
    Ok(())
}

fn set_x_range(s: &mut HistogramSeries, _: &PadStyle, _: &PostProcessStyle) -> StepResult {
    s.x_range = Some(s.display_x_range()?);
    Ok(())
}

fn set_title(s: &mut HistogramSeries, _: &PadStyle, style: &PostProcessStyle) -> StepResult {
    s.hist.title = style.page_title.clone();
    Ok(())
}

/// Read the container at `input`, post-process it into a fresh container at
/// `output`, feeding `sink`.
pub fn run_postprocess(
    input: &Path,
    output: &Path,
    sink: &mut dyn PageSink,
    style: &PostProcessStyle,
) -> Result<PostProcessReport> {
    let container = PlotContainer::read(input)?;
    let mut out = ContainerWriter::create(output)?;
    let report = postprocess(&container, &mut out, sink, style)?;
    out.close()?;
    Ok(report)
}
