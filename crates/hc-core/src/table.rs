//! Two-column sweep table parser.
//!
//! Accepts the loosely formatted tables printed by event generators, e.g.
//! ```text
//! +--------+-----------+
//! |  Mxd   |  Weight   |
//! +========+===========+
//! |  10.0  |  0.5      |
//! |  20.0  |  1.2      |
//! +--------+-----------+
//! ```
//! Border, header and separator lines are dropped, pipes become whitespace, and
//! the first two tokens of every remaining line are read as `(x, y)`.

use serde::Deserialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{DataPoint, DataSeries};

/// Line-filtering conventions for the table format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    /// Lines starting with any of these characters are table borders.
    pub border_chars: Vec<char>,
    /// Lines containing any of these substrings are headers or separators.
    pub header_markers: Vec<String>,
    /// Characters treated as column separators in addition to whitespace.
    pub separators: Vec<char>,
    /// Extension appended when the bare path does not exist.
    pub default_extension: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            border_chars: vec!['+'],
            header_markers: vec!["Mxd".into(), "Weight".into(), "=".into()],
            separators: vec!['|'],
            default_extension: "txt".into(),
        }
    }
}

impl TableFormat {
    fn is_skipped(&self, line: &str) -> bool {
        line.is_empty()
            || line.starts_with(|c: char| self.border_chars.contains(&c))
            || self.header_markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// Parse one line into a point, `None` for headers and malformed rows.
    pub fn parse_line(&self, line: &str) -> Option<DataPoint> {
        let line = line.trim();
        if self.is_skipped(line) {
            return None;
        }
        let mut tokens = line
            .split(|c: char| c.is_whitespace() || self.separators.contains(&c))
            .filter(|t| !t.is_empty());
        let x = tokens.next()?.parse::<f64>().ok()?;
        let y = tokens.next()?.parse::<f64>().ok()?;
        Some(DataPoint { x, y })
    }
}

/// Resolve `path`, falling back to `path.<ext>` when the bare name is missing.
pub fn resolve_input(path: &Path, default_extension: &str) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let mut tried = path.as_os_str().to_owned();
    tried.push(".");
    tried.push(default_extension);
    let tried = PathBuf::from(tried);
    if tried.is_file() {
        tracing::debug!(path = %tried.display(), "resolved table input with default extension");
        return Ok(tried);
    }
    Err(Error::InputNotFound { requested: path.to_path_buf(), tried })
}

/// Parse every valid row from `reader`, in input order.
pub fn parse_table<R: BufRead>(reader: R, format: &TableFormat) -> Result<Vec<DataPoint>> {
    let mut points = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(p) = format.parse_line(&line) {
            points.push(p);
        }
    }
    Ok(points)
}

/// Resolve, read and parse a table file into a non-empty series.
pub fn read_table(path: &Path, format: &TableFormat) -> Result<DataSeries> {
    let resolved = resolve_input(path, &format.default_extension)?;
    let file = std::fs::File::open(&resolved)?;
    let points = parse_table(std::io::BufReader::new(file), format)?;
    tracing::debug!(path = %resolved.display(), rows = points.len(), "parsed table");
    DataSeries::new(points, &resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_path(filename: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!("hepcmp_table_{}_{}_{}", std::process::id(), nanos, filename));
        p
    }

    fn parse(s: &str) -> Vec<DataPoint> {
        parse_table(s.as_bytes(), &TableFormat::default()).unwrap()
    }

    #[test]
    fn pipes_and_comments() {
        let pts = parse("10.0 0.5\n20.0 |1.2|\n# comment\n30.0 2.0\n");
        assert_eq!(
            pts,
            vec![DataPoint::new(10.0, 0.5), DataPoint::new(20.0, 1.2), DataPoint::new(30.0, 2.0)]
        );
    }

    #[test]
    fn boxed_table() {
        let table = "\
+--------+-----------+
|  Mxd   |  Weight   |
+========+===========+
|  10    |  0.25     |
|  50    |  1e-2     |
+--------+-----------+
";
        assert_eq!(parse(table), vec![DataPoint::new(10.0, 0.25), DataPoint::new(50.0, 0.01)]);
    }

    #[test]
    fn header_markers_exclude_numeric_lines() {
        assert!(parse("1.0 2.0 Mxd\n").is_empty());
        assert!(parse("1.0 = 2.0\n").is_empty());
        assert!(parse("+1.0 2.0\n").is_empty());
        assert!(parse("Weight 1 2\n").is_empty());
    }

    #[test]
    fn short_and_non_numeric_rows_are_skipped() {
        let pts = parse("42\n\n   \nabc 1.0\n1.0 xyz\n3.0\t4.0\textra\n");
        assert_eq!(pts, vec![DataPoint::new(3.0, 4.0)]);
    }

    #[test]
    fn duplicates_and_order_preserved() {
        let pts = parse("3 1\n1 2\n3 1\n");
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], pts[2]);
        assert_eq!(pts[1].x, 1.0);
    }

    #[test]
    fn resolves_default_extension() {
        let base = tmp_path("xsec");
        let with_ext = PathBuf::from(format!("{}.txt", base.display()));
        std::fs::write(&with_ext, "10 1\n").unwrap();

        let resolved = resolve_input(&base, "txt").unwrap();
        assert_eq!(resolved, with_ext);
        let series = read_table(&base, &TableFormat::default()).unwrap();
        assert_eq!(series.len(), 1);

        std::fs::remove_file(&with_ext).ok();
    }

    #[test]
    fn missing_input() {
        let base = tmp_path("does_not_exist");
        let err = resolve_input(&base, "txt").unwrap_err();
        match err {
            Error::InputNotFound { requested, tried } => {
                assert_eq!(requested, base);
                assert!(tried.to_string_lossy().ends_with(".txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_file_is_empty_result() {
        let p = tmp_path("header_only.txt");
        std::fs::write(&p, "+----+\n| Mxd | Weight |\n\n+====+\n").unwrap();
        let err = read_table(&p, &TableFormat::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyResult(_)));
        std::fs::remove_file(&p).ok();
    }
}
