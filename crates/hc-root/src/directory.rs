//! TDirectory records and their key lists.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;

/// Directory versions above this value use 64-bit seek pointers.
const LARGE_DIRECTORY_VERSION: u16 = 1000;

/// Location of a directory's key list, as stored in its TDirectory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryHeader {
    /// Offset of the key-list record (`0` for an empty directory).
    pub seek_keys: u64,
    /// Size of the key-list record.
    pub nbytes_keys: u32,
}

impl DirectoryHeader {
    /// Parse a TDirectory streamer at the cursor.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let version = r.read_u16()?;
        let _datime_c = r.read_u32()?;
        let _datime_m = r.read_u32()?;
        let nbytes_keys = r.read_u32()?;
        let _nbytes_name = r.read_u32()?;
        let large = version > LARGE_DIRECTORY_VERSION;
        let _seek_dir = r.read_seek(large)?;
        let _seek_parent = r.read_seek(large)?;
        let seek_keys = r.read_seek(large)?;
        Ok(Self { seek_keys, nbytes_keys })
    }
}

/// The keys of one directory, in file order.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Read the key list described by `header` from the whole-file bytes.
    ///
    /// The list is itself stored behind a TKey header, followed by a u32 key
    /// count and that many TKey headers.
    pub fn read(file: &[u8], header: DirectoryHeader, file_is_large: bool) -> Result<Self> {
        if header.seek_keys == 0 {
            return Ok(Self::default());
        }
        let mut r = RBuffer::at(file, header.seek_keys as usize);
        let _list_key = Key::read(&mut r, file_is_large)?;
        let n_keys = r.read_u32()? as usize;
        let keys = r.read_array(n_keys, |r| Key::read(r, file_is_large))?;
        Ok(Self { keys })
    }

    /// All keys, every cycle included.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The highest cycle stored under `name`.
    pub fn find(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }

    /// Keys with one entry per name (highest cycle), in order of first appearance.
    pub fn latest_keys(&self) -> Vec<&Key> {
        let mut out: Vec<&Key> = Vec::new();
        for key in &self.keys {
            match out.iter_mut().find(|k| k.name == key.name) {
                Some(existing) if existing.cycle < key.cycle => *existing = key,
                Some(_) => {}
                None => out.push(key),
            }
        }
        out
    }
}
