//! Padded display ranges for overlaid histograms.

use serde::{Deserialize, Serialize};

use crate::types::min_positive;

/// Stand-in for the smallest positive bin when no series has one.
pub const MIN_POSITIVE_FALLBACK: f64 = 1e-6;
/// Lower bound for the y floor on log-safe ranges.
pub const FLOOR_EPSILON: f64 = 1e-9;
/// Headroom above the observed maximum.
pub const CEILING_FACTOR: f64 = 1.2;
/// Fraction of the axis width added on each side of the x range.
pub const X_PADDING_FRACTION: f64 = 0.01;

/// Closed display interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower limit.
    pub min: f64,
    /// Upper limit.
    pub max: f64,
}

impl AxisRange {
    /// Create a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Y range covering every series.
///
/// `displayed` holds the bins inside each series' displayed range and gives
/// the observed `y_min`/`y_max`; `all_bins` holds every bin of each series
/// and gives `m`, the smallest strictly positive content. When any displayed
/// value is non-positive or the axis is logarithmic, the floor sits at `m / 2`
/// (never below [`FLOOR_EPSILON`]) and the ceiling at
/// `max(1.2 * y_max, 10 * m)`. Otherwise the floor is `0.9 * y_min` and the
/// ceiling `1.2 * y_max`.
///
/// Returns `None` when no series has a displayed bin.
pub fn padded_y_range(
    displayed: &[&[f64]],
    all_bins: &[&[f64]],
    log_y: bool,
) -> Option<AxisRange> {
    let mut values = displayed.iter().flat_map(|s| s.iter().copied()).peekable();
    values.peek()?;
    let (y_min, y_max) =
        values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if y_min <= 0.0 || log_y {
        let m = all_bins
            .iter()
            .filter_map(|s| min_positive(s))
            .reduce(f64::min)
            .unwrap_or(MIN_POSITIVE_FALLBACK);
        let floor = (m * 0.5).max(FLOOR_EPSILON);
        let ceiling = (y_max * CEILING_FACTOR).max(m * 10.0);
        Some(AxisRange::new(floor, ceiling))
    } else {
        Some(AxisRange::new(y_min * 0.9, y_max * CEILING_FACTOR))
    }
}

/// X range spanning the displayed bins, padded by 1% of its width per side.
///
/// `displayed` holds the low edge of the first and the up edge of the last
/// displayed bin; `nominal` the axis limits used when that span is degenerate.
pub fn padded_x_range(displayed: AxisRange, nominal: AxisRange) -> AxisRange {
    let base = if displayed.width() == 0.0 { nominal } else { displayed };
    let width = base.width();
    let padding = if width != 0.0 {
        X_PADDING_FRACTION * width
    } else {
        X_PADDING_FRACTION * if base.min != 0.0 { base.min.abs() } else { 1.0 }
    };
    AxisRange::new(base.min - padding, base.max + padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_floor_is_half_min_positive() {
        let a = [0.0, 4.0, 8.0];
        let b = [0.2, 1.0, 2.0];
        let c = [3.0, 0.0, 5.0];
        let r = padded_y_range(&[&a, &b, &c], &[&a, &b, &c], true).unwrap();
        assert_eq!(r.min, (0.2_f64 / 2.0).max(1e-9));
        assert_relative_eq!(r.max, 9.6);
    }

    #[test]
    fn non_positive_triggers_safe_floor_even_when_linear() {
        let a = [-1.0, 3.0];
        let r = padded_y_range(&[&a], &[&a], false).unwrap();
        assert_eq!(r.min, 1.5);
        assert_relative_eq!(r.max, 30.0);
    }

    #[test]
    fn no_positive_bins_uses_fallback() {
        let a = [0.0, 0.0];
        let r = padded_y_range(&[&a, &a, &a], &[&a, &a, &a], true).unwrap();
        assert_relative_eq!(r.min, 5e-7);
        assert_relative_eq!(r.max, 1e-5);
        assert!(r.min > 0.0);
    }

    #[test]
    fn tiny_values_clamp_to_epsilon() {
        let a = [1e-12, 1.0];
        let r = padded_y_range(&[&a], &[&a], true).unwrap();
        assert_eq!(r.min, FLOOR_EPSILON);
    }

    #[test]
    fn linear_positive() {
        let a = [2.0, 10.0];
        let b = [4.0, 5.0];
        let r = padded_y_range(&[&a, &b], &[&a, &b], false).unwrap();
        assert_relative_eq!(r.min, 1.8);
        assert_relative_eq!(r.max, 12.0);
    }

    #[test]
    fn positive_minimum_scans_bins_outside_the_displayed_range() {
        let all = [0.01, 0.0, 5.0, 2.0];
        let shown = &all[1..];
        let r = padded_y_range(&[shown], &[&all], true).unwrap();
        assert_eq!(r.min, 0.005);
        assert_relative_eq!(r.max, 6.0);
    }

    #[test]
    fn empty_series() {
        let empty: [f64; 0] = [];
        assert!(padded_y_range(&[&empty, &empty], &[&empty, &empty], false).is_none());
    }

    #[test]
    fn x_padding_one_percent() {
        let r = padded_x_range(AxisRange::new(0.0, 100.0), AxisRange::new(-5.0, 200.0));
        assert_relative_eq!(r.min, -1.0);
        assert_relative_eq!(r.max, 101.0);
    }

    #[test]
    fn degenerate_x_falls_back_to_nominal() {
        let r = padded_x_range(AxisRange::new(3.0, 3.0), AxisRange::new(0.0, 10.0));
        assert_relative_eq!(r.min, -0.1);
        assert_relative_eq!(r.max, 10.1);

        let r = padded_x_range(AxisRange::new(0.0, 0.0), AxisRange::new(0.0, 0.0));
        assert_relative_eq!(r.min, -0.01);
        assert_relative_eq!(r.max, 0.01);
    }
}
