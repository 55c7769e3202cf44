//! TFile header parsing and the top-level histogram interface.

use std::fs;
use std::path::{Path, PathBuf};

use hc_core::Hist1D;

use crate::datasource::DataSource;
use crate::directory::{Directory, DirectoryHeader};
use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::key::{Key, KeyInfo, is_th1_class};
use crate::objects;
use crate::rbuffer::RBuffer;

const ROOT_MAGIC: &[u8; 4] = b"root";
/// File versions at or above this value use 64-bit seek pointers.
const LARGE_FILE_VERSION: u32 = 1_000_000;
/// Shortest byte sequence that can hold a file header.
const MIN_FILE_LEN: usize = 64;

/// Parsed TFile header.
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    is_large: bool,
    top: DirectoryHeader,
}

/// A ROOT file opened for reading histograms.
pub struct RootFile {
    data: DataSource,
    header: FileHeader,
    path: PathBuf,
}

impl std::fmt::Debug for RootFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootFile")
            .field("path", &self.path)
            .field("len", &self.data.len())
            .field("is_large", &self.header.is_large)
            .finish()
    }
}

impl RootFile {
    /// Open and parse a ROOT file from disk using memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        // SAFETY: the map is read-only; files are not expected to change while open.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::from_datasource(DataSource::Mmap(mmap), path)
    }

    /// Parse a ROOT file held in memory.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_datasource(DataSource::Owned(data), path.into())
    }

    fn from_datasource(data: DataSource, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_FILE_LEN || &data[0..4] != ROOT_MAGIC {
            return Err(RootError::BadMagic);
        }
        let header = parse_header(&data)?;
        tracing::debug!(path = %path.display(), large = header.is_large, "opened ROOT file");
        Ok(Self { data, header, path })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All keys of the top-level directory, every cycle included.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        let dir = self.top_directory()?;
        Ok(dir.keys().iter().map(KeyInfo::from).collect())
    }

    /// Names of the 1D histograms in the top-level directory, in file order,
    /// one entry per name.
    pub fn histogram_names(&self) -> Result<Vec<String>> {
        let dir = self.top_directory()?;
        Ok(dir
            .latest_keys()
            .into_iter()
            .filter(|k| is_th1_class(&k.class_name))
            .map(|k| k.name.clone())
            .collect())
    }

    /// Get a histogram by path (`"name"` or `"subdir/name"`), highest cycle.
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = parts.split_last() else {
            return Err(RootError::KeyNotFound(path.to_string()));
        };

        let mut dir = self.top_directory()?;
        for part in dirs {
            let key = dir
                .find(part)
                .ok_or_else(|| RootError::KeyNotFound(format!("{part} (in path {path})")))?;
            if key.class_name != "TDirectoryFile" && key.class_name != "TDirectory" {
                return Err(RootError::Deserialization(format!(
                    "'{part}' is not a directory (class: {})",
                    key.class_name
                )));
            }
            dir = self.subdirectory(key)?;
        }

        let key = dir.find(leaf).ok_or_else(|| RootError::KeyNotFound(path.to_string()))?;
        let payload = key.payload(&self.data)?;
        objects::read_histogram(&payload, &key.class_name)
    }

    /// [`get_histogram`](Self::get_histogram) converted to the shared histogram model.
    pub fn get_hist1d(&self, path: &str) -> Result<Hist1D> {
        self.get_histogram(path).map(Hist1D::from)
    }

    fn top_directory(&self) -> Result<Directory> {
        Directory::read(&self.data, self.header.top, self.header.is_large)
    }

    fn subdirectory(&self, key: &Key) -> Result<Directory> {
        let payload = key.payload(&self.data)?;
        let header = DirectoryHeader::read(&mut RBuffer::new(&payload))?;
        Directory::read(&self.data, header, self.header.is_large)
    }
}

/// Parse the file header and the top directory record at `fBEGIN + fNbytesName`.
///
/// ```text
/// offset  size  field (small file; large files widen fEND, fSeekFree, fSeekInfo to 8)
///    0      4   magic "root"
///    4      4   fVersion
///    8      4   fBEGIN
///   12      4   fEND
///   16      4   fSeekFree
///   20      4   fNbytesFree
///   24      4   nfree
///   28      4   fNbytesName
/// ```
fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let mut r = RBuffer::at(data, ROOT_MAGIC.len());
    let version = r.read_u32()?;
    let is_large = version >= LARGE_FILE_VERSION;
    let begin = r.read_u32()? as usize;
    let _end = r.read_seek(is_large)?;
    let _seek_free = r.read_seek(is_large)?;
    let _nbytes_free = r.read_u32()?;
    let _nfree = r.read_u32()?;
    let nbytes_name = r.read_u32()? as usize;

    let dir_offset = begin + nbytes_name;
    if dir_offset >= data.len() {
        return Err(RootError::Deserialization("TDirectory offset past end of file".into()));
    }
    let top = DirectoryHeader::read(&mut RBuffer::at(data, dir_offset))?;
    Ok(FileHeader { is_large, top })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = vec![0u8; 128];
        bytes[..4].copy_from_slice(b"ROOT");
        assert!(matches!(RootFile::from_bytes(bytes, "x.root"), Err(RootError::BadMagic)));
    }

    #[test]
    fn rejects_short_file() {
        assert!(matches!(
            RootFile::from_bytes(b"root".to_vec(), "x.root"),
            Err(RootError::BadMagic)
        ));
    }

    #[test]
    fn directory_offset_past_end() {
        let mut bytes = vec![0u8; 80];
        bytes[..4].copy_from_slice(ROOT_MAGIC);
        bytes[4..8].copy_from_slice(&62_400u32.to_be_bytes());
        bytes[8..12].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(
            RootFile::from_bytes(bytes, "x.root"),
            Err(RootError::Deserialization(_))
        ));
    }

    #[test]
    fn missing_file_is_io() {
        assert!(matches!(
            RootFile::open("/nonexistent/hepcmp/none.root"),
            Err(RootError::Io(_))
        ));
    }
}
