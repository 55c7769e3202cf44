//! Histogram values returned by [`RootFile::get_histogram`](crate::RootFile::get_histogram).

use hc_core::Hist1D;

/// The x axis of a stored histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisInfo {
    /// Axis title.
    pub title: String,
    /// Number of bins.
    pub n_bins: usize,
    /// Lower axis limit.
    pub x_min: f64,
    /// Upper axis limit.
    pub x_max: f64,
    /// Explicit edges for variable binning (empty when uniform).
    pub variable_edges: Vec<f64>,
    /// First displayed bin (`fFirst`, 0 when unset).
    pub first: i32,
    /// Last displayed bin (`fLast`, 0 when unset).
    pub last: i32,
}

impl AxisInfo {
    /// Bin edges, `n_bins + 1` values.
    pub fn edges(&self) -> Vec<f64> {
        if self.variable_edges.len() == self.n_bins + 1 {
            return self.variable_edges.clone();
        }
        let width = (self.x_max - self.x_min) / self.n_bins.max(1) as f64;
        (0..=self.n_bins).map(|i| self.x_min + i as f64 * width).collect()
    }
}

/// A 1D histogram read from a ROOT file.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
    /// Stored class (`TH1D`, `TH1F`, `TH1I`, `TH1S`).
    pub class_name: String,
    /// Number of in-range bins.
    pub n_bins: usize,
    /// X axis description.
    pub x_axis: AxisInfo,
    /// Y axis title.
    pub y_title: String,
    /// Bin edges (length = n_bins + 1).
    pub bin_edges: Vec<f64>,
    /// Bin contents without under/overflow.
    pub bin_content: Vec<f64>,
    /// Underflow bin content.
    pub underflow: f64,
    /// Overflow bin content.
    pub overflow: f64,
    /// Per-bin sum of squared weights without under/overflow, if stored.
    pub sumw2: Option<Vec<f64>>,
    /// `fEntries`.
    pub entries: f64,
}

impl From<Histogram> for Hist1D {
    fn from(h: Histogram) -> Self {
        let (first_bin, last_bin) = match (h.x_axis.first, h.x_axis.last) {
            (f, l) if f >= 1 && l >= f => (f as usize, l as usize),
            _ => (0, 0),
        };
        Hist1D {
            name: h.name,
            title: h.title,
            bin_edges: h.bin_edges,
            bin_content: h.bin_content,
            sumw2: h.sumw2,
            entries: h.entries,
            first_bin,
            last_bin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(first: i32, last: i32) -> AxisInfo {
        AxisInfo {
            title: "p_{T}".into(),
            n_bins: 4,
            x_min: 0.0,
            x_max: 2.0,
            variable_edges: Vec::new(),
            first,
            last,
        }
    }

    #[test]
    fn uniform_edges() {
        assert_eq!(axis(0, 0).edges(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn variable_edges_win() {
        let mut ax = axis(0, 0);
        ax.variable_edges = vec![0.0, 0.1, 0.5, 1.0, 2.0];
        assert_eq!(ax.edges()[1], 0.1);
    }

    #[test]
    fn conversion_keeps_displayed_range() {
        let ax = axis(2, 3);
        let h = Histogram {
            name: "h".into(),
            title: "t".into(),
            class_name: "TH1D".into(),
            n_bins: 4,
            bin_edges: ax.edges(),
            x_axis: ax,
            y_title: String::new(),
            bin_content: vec![1.0, 2.0, 3.0, 4.0],
            underflow: 0.0,
            overflow: 0.0,
            sumw2: None,
            entries: 10.0,
        };
        let h1: Hist1D = h.into();
        assert_eq!(h1.displayed_bins(), (2, 3));
        assert_eq!(h1.integral(), 5.0);
    }
}
