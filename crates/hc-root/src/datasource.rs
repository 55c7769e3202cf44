//! Byte storage behind an open [`RootFile`](crate::RootFile).

use std::ops::Deref;

/// File bytes, either memory-mapped from disk or owned.
pub enum DataSource {
    /// Bytes held in memory (tests, `from_bytes`).
    Owned(Vec<u8>),
    /// Read-only memory map of the file on disk.
    Mmap(memmap2::Mmap),
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mmap(m) => m,
        }
    }
}
