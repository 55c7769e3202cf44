//! Where comparison histograms come from.

use std::path::Path;

use hc_core::Hist1D;
use hc_root::{RootError, RootFile};

use crate::container::PlotContainer;
use crate::error::Result;

/// A named collection of 1D histograms.
pub trait HistogramSource {
    /// Human-readable origin for log messages.
    fn label(&self) -> String;

    /// Names of the 1D histograms, in storage order, each listed once.
    fn histogram_names(&self) -> Result<Vec<String>>;

    /// Fetch `name`. `Ok(None)` when no 1D histogram of that name exists.
    fn histogram(&self, name: &str) -> Result<Option<Hist1D>>;
}

impl HistogramSource for RootFile {
    fn label(&self) -> String {
        self.path().display().to_string()
    }

    fn histogram_names(&self) -> Result<Vec<String>> {
        Ok(RootFile::histogram_names(self)?)
    }

    fn histogram(&self, name: &str) -> Result<Option<Hist1D>> {
        match self.get_hist1d(name) {
            Ok(h) => Ok(Some(h)),
            Err(RootError::KeyNotFound(_) | RootError::UnsupportedClass(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl HistogramSource for PlotContainer {
    fn label(&self) -> String {
        format!("plot container ({} entries)", self.entries.len())
    }

    fn histogram_names(&self) -> Result<Vec<String>> {
        Ok(self.histograms().map(|h| h.name.clone()).collect())
    }

    fn histogram(&self, name: &str) -> Result<Option<Hist1D>> {
        Ok(self.histograms().find(|h| h.name == name).cloned())
    }
}

/// Open a histogram source by extension: `.json` is a plot container,
/// anything else a ROOT file.
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn HistogramSource>> {
    let path = path.as_ref();
    let is_container = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_container {
        Ok(Box::new(PlotContainer::read(path)?))
    } else {
        Ok(Box::new(RootFile::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerEntry;
    use crate::error::VizError;

    #[test]
    fn container_source_lists_histograms_only() {
        let mut c = PlotContainer::default();
        c.put(ContainerEntry::Histogram(Hist1D::uniform("a", "", 0.0, 1.0, vec![1.0]).unwrap()));
        c.put(ContainerEntry::Composite(crate::plot::CompositePlot::new(
            "plot",
            Default::default(),
            Default::default(),
        )));
        c.put(ContainerEntry::Histogram(Hist1D::uniform("b", "", 0.0, 1.0, vec![2.0]).unwrap()));

        assert_eq!(HistogramSource::histogram_names(&c).unwrap(), vec!["a", "b"]);
        assert!(c.histogram("plot").unwrap().is_none());
        assert_eq!(c.histogram("b").unwrap().map(|h| h.bin_content), Some(vec![2.0]));
    }

    #[test]
    fn missing_root_file_is_fatal() {
        let err = open_source("/nonexistent/hepcmp/run_01.root").err();
        assert!(matches!(err, Some(VizError::Root(RootError::Io(_)))));
    }
}
