//! # hc-core
//!
//! Core types for hepcmp: the plain-text sweep table parser, the 1D histogram
//! model shared by the reader and the plotting pipelines, substring-keyed label
//! rules, and the padded display-range rules used when overlaying histograms.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod labels;
pub mod range;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use labels::{LabelRule, LabelRules};
pub use range::{AxisRange, padded_x_range, padded_y_range};
pub use table::{TableFormat, parse_table, read_table, resolve_input};
pub use types::{DataPoint, DataSeries, Hist1D};
