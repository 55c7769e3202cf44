//! TKey records: the per-object header ROOT uses to locate stored objects.

use crate::decompress::decompress;
use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;

/// Key versions above this value use 64-bit seek pointers.
const LARGE_KEY_VERSION: u16 = 1000;

/// A parsed TKey header.
#[derive(Debug, Clone)]
pub struct Key {
    /// Bytes on disk: key header plus (possibly compressed) object.
    pub n_bytes: u32,
    /// TKey class version.
    pub version: u16,
    /// Uncompressed object length.
    pub obj_len: u32,
    /// Length of the key header.
    pub key_len: u16,
    /// Cycle number within the directory.
    pub cycle: u16,
    /// Absolute file offset of this key.
    pub seek_key: u64,
    /// Class name of the stored object.
    pub class_name: String,
    /// Object name.
    pub name: String,
    /// Object title.
    pub title: String,
}

/// Public summary of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Object name.
    pub name: String,
    /// Object class name (e.g. `TH1D`, `TDirectoryFile`).
    pub class_name: String,
    /// Object title.
    pub title: String,
    /// Cycle number.
    pub cycle: u16,
}

impl From<&Key> for KeyInfo {
    fn from(key: &Key) -> Self {
        Self {
            name: key.name.clone(),
            class_name: key.class_name.clone(),
            title: key.title.clone(),
            cycle: key.cycle,
        }
    }
}

impl KeyInfo {
    /// Whether the key holds a 1D histogram (`TH1D`, `TH1F`, `TH1I`, ...).
    pub fn is_th1(&self) -> bool {
        is_th1_class(&self.class_name)
    }
}

/// Whether `class_name` names a member of the TH1 family (1D only).
pub fn is_th1_class(class_name: &str) -> bool {
    class_name.len() == 4 && class_name.starts_with("TH1")
}

impl Key {
    /// Read a TKey header at the cursor. `file_is_large` forces 64-bit seeks.
    pub fn read(r: &mut RBuffer, file_is_large: bool) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        let obj_len = r.read_u32()?;
        let _datime = r.read_u32()?;
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;

        let large = file_is_large || version > LARGE_KEY_VERSION;
        let seek_key = r.read_seek(large)?;
        let _seek_pdir = r.read_seek(large)?;

        let class_name = r.read_string()?;
        let name = r.read_string()?;
        let title = r.read_string()?;

        Ok(Key { n_bytes, version, obj_len, key_len, cycle, seek_key, class_name, name, title })
    }

    /// Whether the object bytes after the header are compressed.
    pub fn is_compressed(&self) -> bool {
        self.obj_len != self.n_bytes.saturating_sub(self.key_len as u32)
    }

    /// Read and, if needed, decompress the object bytes from `file`.
    pub fn payload(&self, file: &[u8]) -> Result<Vec<u8>> {
        let start = self.seek_key as usize;
        let end = start + self.n_bytes as usize;
        if end > file.len() || (self.key_len as u32) > self.n_bytes {
            return Err(RootError::BufferUnderflow {
                offset: start,
                need: self.n_bytes as usize,
                have: file.len().saturating_sub(start),
            });
        }
        let body = &file[start + self.key_len as usize..end];
        if self.is_compressed() {
            decompress(body, self.obj_len as usize)
        } else {
            Ok(body.to_vec())
        }
    }
}
