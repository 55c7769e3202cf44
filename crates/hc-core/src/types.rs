//! Data model shared by the table parser, the ROOT reader and the plot pipelines.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// One row of a sweep table, e.g. `(Mxd, Weight)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Abscissa (first column).
    pub x: f64,
    /// Ordinate (second column).
    pub y: f64,
}

impl DataPoint {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Ordered, non-empty sequence of points in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    points: Vec<DataPoint>,
}

impl DataSeries {
    /// Wrap `points`, rejecting an empty vector. `source` names the input in the error.
    pub fn new(points: Vec<DataPoint>, source: &Path) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyResult(source.to_path_buf()));
        }
        Ok(Self { points })
    }

    /// Points in input order.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of points (always ≥ 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Abscissa values in order.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Ordinate values in order.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// A 1D histogram with its displayed bin range.
///
/// Bin numbering in the accessor methods follows ROOT: bin 1 is the first
/// in-range bin and bin `n_bins()` the last. Under/overflow are not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    /// Histogram name (key in its container).
    pub name: String,
    /// Histogram title.
    #[serde(default)]
    pub title: String,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents (length = n_bins).
    pub bin_content: Vec<f64>,
    /// Sum of weights squared per bin, if stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sumw2: Option<Vec<f64>>,
    /// Number of entries.
    #[serde(default)]
    pub entries: f64,
    /// First displayed bin (1-based); `0` together with `last_bin == 0` means the full axis.
    #[serde(default)]
    pub first_bin: usize,
    /// Last displayed bin (1-based, inclusive).
    #[serde(default)]
    pub last_bin: usize,
}

impl Hist1D {
    /// Build a histogram from explicit edges and contents.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        bin_edges: Vec<f64>,
        bin_content: Vec<f64>,
    ) -> Result<Self> {
        let entries = bin_content.iter().sum();
        let hist = Self {
            name: name.into(),
            title: title.into(),
            bin_edges,
            bin_content,
            sumw2: None,
            entries,
            first_bin: 0,
            last_bin: 0,
        };
        hist.validate()?;
        Ok(hist)
    }

    /// Check the binning: at least one bin, `n_bins + 1` sorted edges, and a
    /// per-bin sumw2 when one is stored.
    pub fn validate(&self) -> Result<()> {
        let name = &self.name;
        if self.bin_content.is_empty() {
            return Err(Error::Validation(format!("histogram '{name}' has no bins")));
        }
        if self.bin_edges.len() != self.bin_content.len() + 1 {
            return Err(Error::Validation(format!(
                "histogram '{name}': {} edges for {} bins",
                self.bin_edges.len(),
                self.bin_content.len()
            )));
        }
        if self.bin_edges.windows(2).any(|w| w[1] < w[0] || w[0].is_nan() || w[1].is_nan()) {
            return Err(Error::Validation(format!("histogram '{name}': bin edges not sorted")));
        }
        if let Some(sw2) = &self.sumw2
            && sw2.len() != self.bin_content.len()
        {
            return Err(Error::Validation(format!(
                "histogram '{name}': {} sumw2 values for {} bins",
                sw2.len(),
                self.bin_content.len()
            )));
        }
        Ok(())
    }

    /// Build a uniformly binned histogram on `[x_min, x_max]`.
    pub fn uniform(
        name: impl Into<String>,
        title: impl Into<String>,
        x_min: f64,
        x_max: f64,
        bin_content: Vec<f64>,
    ) -> Result<Self> {
        let n = bin_content.len().max(1);
        let width = (x_max - x_min) / n as f64;
        let edges = (0..=n).map(|i| x_min + i as f64 * width).collect();
        Self::new(name, title, edges, bin_content)
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.bin_content.len()
    }

    /// Nominal lower axis limit.
    pub fn x_min(&self) -> f64 {
        self.bin_edges.first().copied().unwrap_or(0.0)
    }

    /// Nominal upper axis limit.
    pub fn x_max(&self) -> f64 {
        self.bin_edges.last().copied().unwrap_or(0.0)
    }

    /// Displayed bin range `(first, last)`, 1-based and inclusive.
    pub fn displayed_bins(&self) -> (usize, usize) {
        let n = self.n_bins();
        if self.first_bin == 0 && self.last_bin == 0 {
            return (1, n);
        }
        let first = self.first_bin.clamp(1, n.max(1));
        let last = self.last_bin.clamp(1, n.max(1));
        if first > last { (1, n) } else { (first, last) }
    }

    /// Restrict the displayed range to bins `first..=last` (1-based).
    pub fn set_displayed_bins(&mut self, first: usize, last: usize) {
        self.first_bin = first;
        self.last_bin = last;
    }

    /// Bin contents inside the displayed range.
    pub fn displayed_contents(&self) -> &[f64] {
        let (first, last) = self.displayed_bins();
        &self.bin_content[first - 1..last]
    }

    /// Sum of bin contents over the displayed range.
    pub fn integral(&self) -> f64 {
        self.displayed_contents().iter().sum()
    }

    /// Multiply all bin contents by `factor` (sumw2 by `factor²`).
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.bin_content {
            *v *= factor;
        }
        if let Some(sw2) = &mut self.sumw2 {
            let f2 = factor * factor;
            for v in sw2 {
                *v *= f2;
            }
        }
    }

    /// Smallest bin content in the displayed range.
    pub fn minimum(&self) -> f64 {
        self.displayed_contents().iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest bin content in the displayed range.
    pub fn maximum(&self) -> f64 {
        self.displayed_contents().iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest strictly positive bin content over all bins.
    pub fn min_positive(&self) -> Option<f64> {
        min_positive(&self.bin_content)
    }

    /// Lower edge of `bin` (1-based).
    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        let idx = bin.saturating_sub(1).min(self.bin_edges.len().saturating_sub(1));
        self.bin_edges[idx]
    }

    /// Upper edge of `bin` (1-based).
    pub fn bin_up_edge(&self, bin: usize) -> f64 {
        let idx = bin.min(self.bin_edges.len().saturating_sub(1));
        self.bin_edges[idx]
    }
}

/// Smallest strictly positive value in `values`.
pub fn min_positive(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|&v| v > 0.0).reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Hist1D {
        Hist1D::uniform("h_pt", "pt", 0.0, 10.0, vec![0.0, 2.0, 4.0, 1.0, 0.5]).unwrap()
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = DataSeries::new(Vec::new(), Path::new("x_section.txt")).unwrap_err();
        assert!(matches!(err, Error::EmptyResult(_)));
    }

    #[test]
    fn uniform_edges() {
        let h = sample();
        assert_eq!(h.bin_edges.len(), 6);
        assert_relative_eq!(h.bin_edges[1], 2.0);
        assert_relative_eq!(h.x_max(), 10.0);
        assert_relative_eq!(h.entries, 7.5);
    }

    #[test]
    fn edge_count_mismatch() {
        assert!(Hist1D::new("h", "", vec![0.0, 1.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn deserialized_histogram_is_checked() {
        let h: Hist1D =
            serde_json::from_str(r#"{"name":"h","bin_edges":[],"bin_content":[1.0,2.0]}"#).unwrap();
        assert!(matches!(h.validate(), Err(Error::Validation(_))));

        let mut h = sample();
        assert!(h.validate().is_ok());
        h.bin_edges.swap(1, 2);
        assert!(h.validate().is_err());

        let mut h = sample();
        h.sumw2 = Some(vec![1.0; 2]);
        assert!(h.validate().is_err());
    }

    #[test]
    fn series_is_never_empty() {
        let s = DataSeries::new(vec![DataPoint { x: 1.0, y: 2.0 }], Path::new("t.txt")).unwrap();
        assert_eq!(s.len(), 1);
        assert!(!s.is_empty());
    }

    #[test]
    fn integral_and_scale() {
        let mut h = sample();
        assert_relative_eq!(h.integral(), 7.5);
        h.sumw2 = Some(vec![1.0; 5]);
        h.scale(2.0);
        assert_relative_eq!(h.integral(), 15.0);
        assert_relative_eq!(h.sumw2.as_ref().unwrap()[0], 4.0);
    }

    #[test]
    fn displayed_range_limits_statistics() {
        let mut h = sample();
        h.set_displayed_bins(2, 3);
        assert_eq!(h.displayed_bins(), (2, 3));
        assert_relative_eq!(h.integral(), 6.0);
        assert_relative_eq!(h.minimum(), 2.0);
        assert_relative_eq!(h.maximum(), 4.0);
        assert_relative_eq!(h.bin_low_edge(2), 2.0);
        assert_relative_eq!(h.bin_up_edge(3), 6.0);
    }

    #[test]
    fn min_positive_skips_zero() {
        assert_eq!(sample().min_positive(), Some(0.5));
        assert_eq!(min_positive(&[0.0, -1.0]), None);
    }
}
