//! TH1 family deserialization.
//!
//! Streamed layout of `TH1D` (other element types differ only in the final array):
//! ```text
//! TH1D                      version + byte count
//! ├─ TH1                    version + byte count
//! │  ├─ TNamed              fName, fTitle
//! │  ├─ TAttLine/Fill/Marker
//! │  ├─ fNcells             i32
//! │  ├─ fXaxis fYaxis fZaxis TAxis
//! │  ├─ fBarOffset fBarWidth i16
//! │  ├─ fEntries fTsumw fTsumw2 fTsumwx fTsumwx2   f64
//! │  ├─ fMaximum fMinimum fNormFactor             f64
//! │  ├─ fContour fSumw2     TArrayD
//! │  └─ fOption fFunctions fBuffer ...            (skipped via byte count)
//! └─ TArrayD                n + n×f64, including under/overflow
//! ```

use crate::error::{Result, RootError};
use crate::histogram::{AxisInfo, Histogram};
use crate::rbuffer::RBuffer;

/// Element type of the trailing bin-content array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinArray {
    F64,
    F32,
    I32,
    I16,
    I8,
}

impl BinArray {
    fn read(self, r: &mut RBuffer, n: usize) -> Result<Vec<f64>> {
        match self {
            BinArray::F64 => r.read_array(n, RBuffer::read_f64),
            BinArray::F32 => r.read_array(n, |r| r.read_f32().map(f64::from)),
            BinArray::I32 => r.read_array(n, |r| r.read_i32().map(f64::from)),
            BinArray::I16 => r.read_array(n, |r| r.read_i16().map(f64::from)),
            BinArray::I8 => r.read_array(n, |r| r.read_i8().map(f64::from)),
        }
    }
}

/// Fields of the TH1 base record that we keep.
struct Th1Base {
    name: String,
    title: String,
    n_cells: usize,
    x_axis: AxisInfo,
    y_title: String,
    entries: f64,
    sumw2: Vec<f64>,
}

pub fn read_th1(data: &[u8], class_name: &str, bins: BinArray) -> Result<Histogram> {
    let mut r = RBuffer::new(data);
    let outer = r.read_version()?;
    if outer.version < 1 {
        return Err(RootError::Deserialization(format!(
            "unsupported {class_name} version {}",
            outer.version
        )));
    }

    let base = read_th1_base(&mut r)?;

    let n = r.read_u32()? as usize;
    if n != base.n_cells {
        return Err(RootError::Deserialization(format!(
            "{class_name} '{}': array of {n} cells, fNcells = {}",
            base.name, base.n_cells
        )));
    }
    let raw = bins.read(&mut r, n)?;
    build(base, class_name, &raw)
}

fn read_th1_base(r: &mut RBuffer) -> Result<Th1Base> {
    let header = r.read_version()?;
    if header.end.is_none() {
        return Err(RootError::Deserialization(
            "TH1 record without byte count is not supported".into(),
        ));
    }

    let (name, title) = r.read_tnamed()?;
    r.skip_record()?; // TAttLine
    r.skip_record()?; // TAttFill
    r.skip_record()?; // TAttMarker

    let n_cells = r.read_i32()?;
    if n_cells < 2 {
        return Err(RootError::Deserialization(format!("'{name}': fNcells = {n_cells}")));
    }

    let x_axis = read_taxis(r)?;
    let y_title = read_taxis(r)?.title;
    r.skip_record()?; // fZaxis

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    let _tsumw = r.read_f64()?;
    let _tsumw2 = r.read_f64()?;
    let _tsumwx = r.read_f64()?;
    let _tsumwx2 = r.read_f64()?;
    if header.version >= 2 {
        let _maximum = r.read_f64()?;
        let _minimum = r.read_f64()?;
    }
    if header.version >= 3 {
        let _norm_factor = r.read_f64()?;
    }
    let _contour = r.read_tarray_f64()?;
    let sumw2 = r.read_tarray_f64()?;

    // fOption, fFunctions, fBuffer and the newer stat fields are not needed.
    r.finish_record(header);

    Ok(Th1Base { name, title, n_cells: n_cells as usize, x_axis, y_title, entries, sumw2 })
}

fn read_taxis(r: &mut RBuffer) -> Result<AxisInfo> {
    let header = r.read_version()?;
    let (_name, title) = r.read_tnamed()?;
    r.skip_record()?; // TAttAxis

    let n_bins = r.read_i32()?;
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;
    let variable_edges = r.read_tarray_f64()?;
    let first = r.read_i32()?;
    let last = r.read_i32()?;
    r.finish_record(header);

    if n_bins < 1 {
        return Err(RootError::Deserialization(format!("axis '{title}' has {n_bins} bins")));
    }
    Ok(AxisInfo { title, n_bins: n_bins as usize, x_min, x_max, variable_edges, first, last })
}

fn build(base: Th1Base, class_name: &str, raw: &[f64]) -> Result<Histogram> {
    let n_bins = base.x_axis.n_bins;
    if raw.len() < n_bins + 2 {
        return Err(RootError::Deserialization(format!(
            "'{}': {} cells for {n_bins} bins",
            base.name,
            raw.len()
        )));
    }

    // Cells are [underflow, bin 1 .. bin n, overflow].
    let bin_content = raw[1..=n_bins].to_vec();
    let sumw2 = (base.sumw2.len() == raw.len()).then(|| base.sumw2[1..=n_bins].to_vec());

    Ok(Histogram {
        bin_edges: base.x_axis.edges(),
        name: base.name,
        title: base.title,
        class_name: class_name.to_string(),
        n_bins,
        underflow: raw[0],
        overflow: raw[n_bins + 1],
        x_axis: base.x_axis,
        y_title: base.y_title,
        bin_content,
        sumw2,
        entries: base.entries,
    })
}
