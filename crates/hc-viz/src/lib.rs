//! # hc-viz
//!
//! Plot artifacts and the histogram comparison pipelines for hepcmp.
//!
//! The comparator overlays one histogram name from three sources into a
//! [`CompositePlot`] and writes it to a [`PlotContainer`]; the post-processor
//! restyles every composite of such a container and hands each one to a
//! [`PageSink`] (the multi-page PDF writer lives in `hc-viz-render`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod config;
pub mod container;
pub mod curve;
pub mod error;
pub mod plot;
pub mod postprocess;
pub mod source;

pub use compare::{CompareReport, build_composite, compare_histograms, run_comparison};
pub use config::{ComparisonConfig, PostProcessStyle, Preset};
pub use container::{CONTAINER_SCHEMA_VERSION, ContainerEntry, ContainerWriter, PlotContainer};
pub use curve::{CurveArtifact, CurveStyle};
pub use error::{Result, StyleError, VizError};
pub use plot::{
    Annotation, AxisStyle, CanvasSize, CompositePlot, HistogramSeries, Legend, LegendEntry,
    Margins, PadStyle, Primitive, TextAnchor,
};
pub use postprocess::{PageSink, PostProcessReport, postprocess, run_postprocess};
pub use source::{HistogramSource, open_source};
