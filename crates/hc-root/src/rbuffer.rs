//! Big-endian cursor over ROOT streamer bytes.

use crate::error::{Result, RootError};

/// `kByteCountMask`: set on the leading u32 of a versioned record that carries a byte count.
const BYTE_COUNT_MASK: u32 = 0x4000_0000;
/// `kIsReferenced` bit of `TObject::fBits`.
const IS_REFERENCED: u32 = 0x0000_0010;

/// A cursor over a byte slice using ROOT's big-endian conventions.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Version header of a streamed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Class version.
    pub version: u16,
    /// Absolute position one past the record, when a byte count was written.
    pub end: Option<usize>,
}

macro_rules! read_be {
    ($name:ident, $ty:ty, $n:expr) => {
        #[doc = concat!("Read a big-endian `", stringify!($ty), "`.")]
        pub fn $name(&mut self) -> Result<$ty> {
            let b = self.read_bytes($n)?;
            let mut arr = [0u8; $n];
            arr.copy_from_slice(b);
            Ok(<$ty>::from_be_bytes(arr))
        }
    };
}

impl<'a> RBuffer<'a> {
    /// Reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reader positioned at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute position.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Advance by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    read_be!(read_u8, u8, 1);
    read_be!(read_i8, i8, 1);
    read_be!(read_u16, u16, 2);
    read_be!(read_i16, i16, 2);
    read_be!(read_u32, u32, 4);
    read_be!(read_i32, i32, 4);
    read_be!(read_u64, u64, 8);
    read_be!(read_f32, f32, 4);
    read_be!(read_f64, f64, 8);

    /// Read a seek pointer: u64 for large records, u32 otherwise.
    pub fn read_seek(&mut self, large: bool) -> Result<u64> {
        if large { self.read_u64() } else { Ok(self.read_u32()? as u64) }
    }

    /// Read a `TString`: one length byte, or `255` followed by a u32 length.
    pub fn read_string(&mut self) -> Result<String> {
        let len = match self.read_u8()? {
            255 => self.read_u32()? as usize,
            n => n as usize,
        };
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a record version header.
    pub fn read_version(&mut self) -> Result<RecordHeader> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK != 0 {
            let count = (raw & !BYTE_COUNT_MASK) as usize;
            let version = self.read_u16()?;
            Ok(RecordHeader { version, end: Some(start + 4 + count) })
        } else {
            // No byte count: the first two bytes were the version.
            self.pos = start + 2;
            Ok(RecordHeader { version: (raw >> 16) as u16, end: None })
        }
    }

    /// Jump to the end of a record if its header carried a byte count.
    pub fn finish_record(&mut self, header: RecordHeader) {
        if let Some(end) = header.end
            && end > self.pos
        {
            self.pos = end;
        }
    }

    /// Skip a whole versioned record (requires a byte count).
    pub fn skip_record(&mut self) -> Result<()> {
        let header = self.read_version()?;
        match header.end {
            Some(end) if end >= self.pos && end <= self.data.len() => {
                self.pos = end;
                Ok(())
            }
            Some(end) => Err(RootError::Deserialization(format!(
                "record end {end} outside buffer of {} bytes",
                self.data.len()
            ))),
            // Version-only records (old TAttLine etc.) carry no body we can size.
            None => Ok(()),
        }
    }

    /// Read a `TObject` base: version, fUniqueID, fBits (+ pidf when referenced).
    pub fn read_tobject(&mut self) -> Result<()> {
        let _version = self.read_u16()?;
        let _unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?;
        }
        Ok(())
    }

    /// Read a `TNamed` record, returning `(name, title)`.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let header = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        self.finish_record(header);
        Ok((name, title))
    }

    /// Read a `TArrayD` (u32 length + f64 values).
    pub fn read_tarray_f64(&mut self) -> Result<Vec<f64>> {
        let n = self.read_u32()? as usize;
        self.read_array(n, Self::read_f64)
    }

    /// Read `n` values with `f`.
    pub fn read_array<T>(
        &mut self,
        n: usize,
        mut f: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.ensure(n)?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(f(self)?);
        }
        Ok(out)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos.saturating_add(n) > self.data.len() {
            return Err(RootError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18];
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0x0102_0304);
        assert!((r.read_f64().unwrap() - std::f64::consts::PI).abs() < 1e-15);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_and_long_strings() {
        let mut data = vec![2, b'h', b'1'];
        data.push(255);
        data.extend_from_slice(&300u32.to_be_bytes());
        data.extend(std::iter::repeat_n(b'x', 300));
        let mut r = RBuffer::new(&data);
        assert_eq!(r.read_string().unwrap(), "h1");
        assert_eq!(r.read_string().unwrap().len(), 300);
    }

    #[test]
    fn version_with_byte_count() {
        let mut data = Vec::new();
        data.extend_from_slice(&(BYTE_COUNT_MASK | 16).to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&[0u8; 20]);
        let mut r = RBuffer::new(&data);
        let h = r.read_version().unwrap();
        assert_eq!(h, RecordHeader { version: 3, end: Some(20) });
        r.finish_record(h);
        assert_eq!(r.pos(), 20);
    }

    #[test]
    fn version_without_byte_count() {
        let data = [0x00, 0x05, 0xAA, 0xBB];
        let mut r = RBuffer::new(&data);
        let h = r.read_version().unwrap();
        assert_eq!(h.version, 5);
        assert!(h.end.is_none());
        assert_eq!(r.pos(), 2);
    }

    #[test]
    fn underflow_reports_position() {
        let mut r = RBuffer::at(&[1, 2, 3], 2);
        match r.read_u32() {
            Err(RootError::BufferUnderflow { offset, need, have }) => {
                assert_eq!((offset, need, have), (2, 4, 1));
            }
            other => panic!("expected underflow, got {other:?}"),
        }
    }
}
