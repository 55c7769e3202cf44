//! Line + marker graph of a parameter sweep.

use hc_core::DataSeries;
use serde::{Deserialize, Serialize};

use crate::config::K_BLUE;
use crate::plot::CanvasSize;

/// Appearance and naming of the sweep graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveStyle {
    /// Title template; `{mass}` is replaced by [`mass`](Self::mass).
    pub title_template: String,
    /// Common mass of the heavy Higgs states, in GeV.
    pub mass: f64,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// Line color.
    pub line_color: String,
    /// Marker color.
    pub marker_color: String,
    /// ROOT marker style (20 = filled circle).
    pub marker_style: u16,
    /// Marker size multiplier.
    pub marker_size: f64,
    /// Canvas size.
    pub canvas: CanvasSize,
    /// Output file stem; `.png` and `.pdf` are appended.
    pub output_stem: String,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            title_template: "Cross section vs Mxd (mh2=mh3=mhc={mass} GeV)".into(),
            mass: 700.0,
            x_title: "Mxd".into(),
            y_title: "Weight [pb]".into(),
            line_color: K_BLUE.into(),
            marker_color: K_BLUE.into(),
            marker_style: 20,
            marker_size: 1.0,
            canvas: CanvasSize::new(800, 600),
            output_stem: "Mxd_vs_Weight".into(),
        }
    }
}

impl CurveStyle {
    /// The title with the mass filled in (`700`, not `700.0`).
    pub fn title(&self) -> String {
        let mass = if self.mass.fract() == 0.0 && self.mass.abs() < 1e15 {
            format!("{:.0}", self.mass)
        } else {
            self.mass.to_string()
        };
        self.title_template.replace("{mass}", &mass)
    }
}

/// Plot-friendly sweep graph: points in file order plus styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveArtifact {
    /// Graph title.
    pub title: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// X values.
    pub x: Vec<f64>,
    /// Y values aligned with `x`.
    pub y: Vec<f64>,
    /// Style used to build and draw the graph.
    pub style: CurveStyle,
}

impl CurveArtifact {
    /// Build the graph of `series` with `style`.
    pub fn from_series(series: &DataSeries, style: &CurveStyle) -> Self {
        Self {
            title: style.title(),
            x_title: style.x_title.clone(),
            y_title: style.y_title.clone(),
            x: series.xs(),
            y: series.ys(),
            style: style.clone(),
        }
    }

    /// `(min, max)` of the x values.
    pub fn x_bounds(&self) -> (f64, f64) {
        bounds(&self.x)
    }

    /// `(min, max)` of the y values.
    pub fn y_bounds(&self) -> (f64, f64) {
        bounds(&self.y)
    }
}

fn bounds(v: &[f64]) -> (f64, f64) {
    v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hc_core::DataPoint;
    use std::path::Path;

    #[test]
    fn title_formats_integral_mass() {
        assert_eq!(CurveStyle::default().title(), "Cross section vs Mxd (mh2=mh3=mhc=700 GeV)");
        let style = CurveStyle { mass: 512.5, ..CurveStyle::default() };
        assert_eq!(style.title(), "Cross section vs Mxd (mh2=mh3=mhc=512.5 GeV)");
    }

    #[test]
    fn artifact_keeps_file_order() {
        let series = DataSeries::new(
            vec![DataPoint::new(30.0, 2.0), DataPoint::new(10.0, 0.5), DataPoint::new(20.0, 1.2)],
            Path::new("x_section.txt"),
        )
        .unwrap();
        let art = CurveArtifact::from_series(&series, &CurveStyle::default());
        assert_eq!(art.x, vec![30.0, 10.0, 20.0]);
        assert_eq!(art.y, vec![2.0, 0.5, 1.2]);
        assert_eq!(art.x_bounds(), (10.0, 30.0));
        assert_eq!(art.y_bounds(), (0.5, 2.0));
        assert_eq!(art.x_title, "Mxd");
        assert_eq!(art.y_title, "Weight [pb]");
        assert_eq!(art.style.canvas, CanvasSize::new(800, 600));
    }
}
