//! Object payload readers, dispatched on the stored class name.

mod th1;

use crate::error::{Result, RootError};
use crate::histogram::Histogram;

/// Read a 1D histogram from a decompressed object payload.
pub fn read_histogram(payload: &[u8], class_name: &str) -> Result<Histogram> {
    let bins = match class_name {
        "TH1D" => th1::BinArray::F64,
        "TH1F" => th1::BinArray::F32,
        "TH1I" => th1::BinArray::I32,
        "TH1S" => th1::BinArray::I16,
        "TH1C" => th1::BinArray::I8,
        other => return Err(RootError::UnsupportedClass(other.to_string())),
    };
    th1::read_th1(payload, class_name, bins)
}
