//! JSON plot containers: named composite plots and raw histograms.

use std::fs;
use std::path::{Path, PathBuf};

use hc_core::Hist1D;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::plot::CompositePlot;

/// Schema tag written into every container.
pub const CONTAINER_SCHEMA_VERSION: &str = "hepcmp_plot_container_v1";

/// One named object in a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContainerEntry {
    /// A saved drawing surface.
    Composite(CompositePlot),
    /// A bare histogram.
    Histogram(Hist1D),
}

impl ContainerEntry {
    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            ContainerEntry::Composite(c) => &c.name,
            ContainerEntry::Histogram(h) => &h.name,
        }
    }
}

/// A plot container as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotContainer {
    /// Always [`CONTAINER_SCHEMA_VERSION`].
    pub schema_version: String,
    /// Entries in write order, names unique.
    pub entries: Vec<ContainerEntry>,
}

impl Default for PlotContainer {
    fn default() -> Self {
        Self { schema_version: CONTAINER_SCHEMA_VERSION.to_string(), entries: Vec::new() }
    }
}

impl PlotContainer {
    /// Read and validate a container file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let container: PlotContainer = serde_json::from_str(&text)?;
        if container.schema_version != CONTAINER_SCHEMA_VERSION {
            return Err(VizError::Container {
                path: path.display().to_string(),
                reason: format!("unsupported schema_version '{}'", container.schema_version),
            });
        }
        container.validate().map_err(|e| VizError::Container {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(container)
    }

    /// Check the binning of every raw histogram and of every histogram drawn
    /// in a composite.
    pub fn validate(&self) -> hc_core::Result<()> {
        for entry in &self.entries {
            match entry {
                ContainerEntry::Histogram(h) => h.validate()?,
                ContainerEntry::Composite(c) => {
                    for series in c.histograms() {
                        series.hist.validate()?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Entry named `name`.
    pub fn get(&self, name: &str) -> Option<&ContainerEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Insert `entry`, replacing an existing entry of the same name in place.
    pub fn put(&mut self, entry: ContainerEntry) {
        match self.entries.iter_mut().find(|e| e.name() == entry.name()) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// Composite entries in order.
    pub fn composites(&self) -> impl Iterator<Item = &CompositePlot> {
        self.entries.iter().filter_map(|e| match e {
            ContainerEntry::Composite(c) => Some(c),
            ContainerEntry::Histogram(_) => None,
        })
    }

    /// Raw histogram entries in order.
    pub fn histograms(&self) -> impl Iterator<Item = &Hist1D> {
        self.entries.iter().filter_map(|e| match e {
            ContainerEntry::Histogram(h) => Some(h),
            ContainerEntry::Composite(_) => None,
        })
    }

    /// Write the container as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }
}

/// Writer for a container that is being filled.
///
/// `create` truncates the target right away; entries are flushed by
/// [`close`](Self::close).
#[derive(Debug)]
pub struct ContainerWriter {
    path: PathBuf,
    container: PlotContainer,
}

impl ContainerWriter {
    /// Create (or truncate) the container at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let container = PlotContainer::default();
        container.write(&path)?;
        Ok(Self { path, container })
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.container.entries.len()
    }

    /// Whether nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.container.entries.is_empty()
    }

    /// Add an entry; an existing entry with the same name is replaced.
    pub fn write_entry(&mut self, entry: ContainerEntry) {
        tracing::debug!(entry = entry.name(), path = %self.path.display(), "container entry");
        self.container.put(entry);
    }

    /// Flush all entries and return the path written.
    pub fn close(self) -> Result<PathBuf> {
        self.container.write(&self.path)?;
        Ok(self.path)
    }
}
