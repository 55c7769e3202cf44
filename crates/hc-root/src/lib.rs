//! # hc-root
//!
//! Read-only access to 1D histograms stored in `.root` files, without ROOT
//! itself. Handles small and large (64-bit seek) files, nested directories,
//! and zlib, LZ4, ZSTD and XZ compressed objects.
//!
//! ## Example
//!
//! ```no_run
//! use hc_root::RootFile;
//!
//! let f = RootFile::open("unweighted_events.root").unwrap();
//! for name in f.histogram_names().unwrap() {
//!     let h = f.get_histogram(&name).unwrap();
//!     println!("{name}: {} bins, integral {}", h.n_bins, h.bin_content.iter().sum::<f64>());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datasource;
pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
pub mod histogram;
pub mod key;
pub mod objects;
pub mod rbuffer;

pub use error::{Result, RootError};
pub use file::RootFile;
pub use histogram::{AxisInfo, Histogram};
pub use key::KeyInfo;
