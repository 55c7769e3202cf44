//! ROOT compressed-object decoding.
//!
//! A compressed object is a sequence of blocks, each with a 9-byte header:
//! ```text
//! bytes 0-1  algorithm: "ZL" zlib, "L4" LZ4, "ZS" zstd, "XZ" lzma
//! byte  2    method
//! bytes 3-5  compressed size   (LE24)
//! bytes 6-8  uncompressed size (LE24)
//! ```

use std::io::Read;

use crate::error::{Result, RootError};

const BLOCK_HEADER_LEN: usize = 9;
/// LZ4 blocks carry an xxhash64 of the payload before the LZ4 stream.
const LZ4_CHECKSUM_LEN: usize = 8;

/// Decode all blocks of `src` into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut offset = 0;

    while out.len() < expected_len {
        let header = src.get(offset..offset + BLOCK_HEADER_LEN).ok_or_else(|| {
            RootError::Decompression(format!(
                "truncated block header at offset {offset} ({} of {expected_len} bytes decoded)",
                out.len()
            ))
        })?;
        let c_size = le24(&header[3..6]);
        let u_size = le24(&header[6..9]);
        let body_start = offset + BLOCK_HEADER_LEN;
        let body = src.get(body_start..body_start + c_size).ok_or_else(|| {
            RootError::Decompression(format!(
                "block claims {c_size} bytes but only {} remain",
                src.len().saturating_sub(body_start)
            ))
        })?;

        let block = match &header[0..2] {
            b"ZL" => zlib(body, u_size)?,
            b"L4" => lz4(body, u_size)?,
            b"ZS" => zstd(body, u_size)?,
            b"XZ" => xz(body, u_size)?,
            tag => {
                return Err(RootError::Decompression(format!(
                    "unsupported compression algorithm {:?}",
                    String::from_utf8_lossy(tag)
                )));
            }
        };
        if block.len() != u_size {
            return Err(RootError::Decompression(format!(
                "block decoded to {} bytes, header says {u_size}",
                block.len()
            )));
        }
        out.extend_from_slice(&block);
        offset = body_start + c_size;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "decoded {} bytes, expected {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}

fn zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zlib: {e}")))?;
    Ok(out)
}

fn lz4(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let stream = data
        .get(LZ4_CHECKSUM_LEN..)
        .ok_or_else(|| RootError::Decompression("lz4 block shorter than its checksum".into()))?;
    lz4_flex::decompress(stream, expected).map_err(|e| RootError::Decompression(format!("lz4: {e}")))
}

fn zstd(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected];
    let written = ruzstd::decoding::FrameDecoder::new()
        .decode_all(data, &mut out)
        .map_err(|e| RootError::Decompression(format!("zstd: {e}")))?;
    out.truncate(written);
    Ok(out)
}

fn xz(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    lzma_rs::xz_decompress(&mut std::io::BufReader::new(data), &mut out)
        .map_err(|e| RootError::Decompression(format!("xz: {e}")))?;
    Ok(out)
}

fn le24(b: &[u8]) -> usize {
    b[0] as usize | (b[1] as usize) << 8 | (b[2] as usize) << 16
}
