//! Comparison presets and their YAML overrides.

use std::path::{Path, PathBuf};

use hc_core::LabelRules;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::error::{Result, VizError};
use crate::plot::{CanvasSize, Margins, PadStyle, TextAnchor};

/// ROOT `kRed`.
pub const K_RED: &str = "#ff0000";
/// ROOT `kBlue`.
pub const K_BLUE: &str = "#0000ff";
/// ROOT `kGreen`.
pub const K_GREEN: &str = "#00ff00";

/// Y title given to comparison frames.
pub const EVENTS_TITLE: &str = "Number of Events";

/// Built-in comparison setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Three `tan θ` points of the gg → h1 χχ̄ sample, log-y, square frame.
    #[default]
    TanBetaScan,
    /// Three heavy-Higgs masses of the h-decay sample, linear y.
    HiggsMassScan,
}

impl Preset {
    /// The configuration this preset stands for.
    pub fn config(self) -> ComparisonConfig {
        match self {
            Preset::TanBetaScan => ComparisonConfig::tan_beta_scan(),
            Preset::HiggsMassScan => ComparisonConfig::higgs_mass_scan(),
        }
    }
}

/// Placement of the particle label and the parameter lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationLayout {
    /// NDC position of the first text.
    pub origin: [f64; 2],
    /// NDC step taken after the particle label.
    pub after_label: [f64; 2],
    /// NDC step taken after each parameter.
    pub after_param: [f64; 2],
    /// Text size in pixels.
    pub text_size: f64,
    /// Anchor of every text.
    pub anchor: TextAnchor,
}

impl Default for AnnotationLayout {
    fn default() -> Self {
        Self {
            origin: [0.18, 0.82],
            after_label: [0.0, -0.05],
            after_param: [0.0, -0.05],
            text_size: 20.0,
            anchor: TextAnchor::BottomLeft,
        }
    }
}

impl AnnotationLayout {
    /// NDC positions for a label (when present) followed by `n_params` parameters.
    pub fn positions(&self, has_label: bool, n_params: usize) -> Vec<[f64; 2]> {
        let mut at = self.origin;
        let mut out = Vec::with_capacity(n_params + 1);
        if has_label {
            out.push(at);
            at = [at[0] + self.after_label[0], at[1] + self.after_label[1]];
        }
        for _ in 0..n_params {
            out.push(at);
            at = [at[0] + self.after_param[0], at[1] + self.after_param[1]];
        }
        out
    }
}

/// Legend box (NDC) and text size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendBox {
    /// Lower-left x.
    pub x1: f64,
    /// Lower-left y.
    pub y1: f64,
    /// Upper-right x.
    pub x2: f64,
    /// Upper-right y.
    pub y2: f64,
    /// Text size in pixels.
    pub text_size: f64,
}

impl Default for LegendBox {
    fn default() -> Self {
        Self { x1: 0.7, y1: 0.7, x2: 0.8, y2: 0.85, text_size: 20.0 }
    }
}

/// Output file names of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    /// Container written by the comparator.
    pub comparison: PathBuf,
    /// Container written by the post-processor.
    pub modified: PathBuf,
    /// Multi-page document written by the post-processor.
    pub pdf: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            comparison: "histogram_tan_comparison.json".into(),
            modified: "modified_histogram_tan_comparison.json".into(),
            pdf: "output_tan_norm.pdf".into(),
        }
    }
}

/// Second-pass restyling applied to every histogram primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessStyle {
    /// Y axis title.
    pub y_title: String,
    /// X axis titles keyed on the primitive name.
    pub x_axis_labels: LabelRules,
    /// Canvas size of every page.
    pub canvas: CanvasSize,
    /// X title offset.
    pub x_title_offset: f64,
    /// Y title offset.
    pub y_title_offset: f64,
    /// Tick label size of both axes.
    pub label_size: f64,
    /// Title size of both axes.
    pub title_size: f64,
    /// Line width of every histogram.
    pub line_width: f64,
    /// Title set on every primitive.
    pub page_title: String,
}

impl Default for PostProcessStyle {
    fn default() -> Self {
        Self {
            y_title: EVENTS_TITLE.into(),
            x_axis_labels: LabelRules::kinematics_short(),
            canvas: CanvasSize::square(),
            x_title_offset: 1.3,
            y_title_offset: 1.5,
            label_size: 0.04,
            title_size: 0.045,
            line_width: 3.0,
            page_title: "g g > h1 xd xd~".into(),
        }
    }
}

/// Everything the comparator and post-processor need for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Preset this configuration started from.
    pub preset: Preset,
    /// Input files, in legend order.
    pub inputs: [PathBuf; 3],
    /// Per-input scale factor, applied when the integral is non-zero.
    pub scale_factors: [f64; 3],
    /// Per-input line color.
    pub colors: [String; 3],
    /// Per-input legend label.
    pub legend_labels: [String; 3],
    /// Index of the input that provides the axes.
    pub frame_series: usize,
    /// Comparison canvas size.
    pub canvas: CanvasSize,
    /// Pad options.
    pub pad: PadStyle,
    /// Y title of the frame.
    pub y_title: String,
    /// X axis titles keyed on the histogram name.
    pub x_axis_labels: LabelRules,
    /// Particle labels keyed on the histogram name.
    pub particle_labels: LabelRules,
    /// Fixed parameter lines drawn after the particle label.
    pub extra_params: Vec<String>,
    /// Annotation placement.
    pub annotation: AnnotationLayout,
    /// Legend placement.
    pub legend: LegendBox,
    /// Output names.
    pub output: OutputPaths,
    /// Post-processing style.
    pub post: PostProcessStyle,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self::tan_beta_scan()
    }
}

fn strings(items: [&str; 3]) -> [String; 3] {
    items.map(String::from)
}

impl ComparisonConfig {
    /// `tan θ` = 1, 10, 15 normalized to cross section, log-y square frame.
    pub fn tan_beta_scan() -> Self {
        let run = |n: &str| {
            PathBuf::from(format!(
                "../bin/template_gg_h1xdxd_sin/Events/run_{n}_decayed_1/unweighted_events.root"
            ))
        };
        Self {
            preset: Preset::TanBetaScan,
            inputs: [run("06"), run("14"), run("15")],
            scale_factors: [0.03401011318, 0.7855705028000001, 0.7213413323000001],
            colors: strings([K_RED, K_BLUE, K_GREEN]),
            legend_labels: strings(["tan#theta = 1.0", "tan#theta = 10.0", "tan#theta = 15.0"]),
            frame_series: 1,
            canvas: CanvasSize::square(),
            pad: PadStyle {
                margins: Margins { left: 0.15, right: 0.15, top: 0.10, bottom: 0.15 },
                log_y: true,
                ticks_all_sides: true,
                fixed_aspect: true,
            },
            y_title: EVENTS_TITLE.into(),
            x_axis_labels: LabelRules::kinematics_short(),
            particle_labels: LabelRules::particles(),
            extra_params: vec!["M_{a} = 500 GeV".into(), "M_{#chi}= 10 GeV".into()],
            annotation: AnnotationLayout {
                origin: [0.16, 0.94],
                after_label: [0.29, 0.0],
                after_param: [0.20, 0.0],
                text_size: 20.0,
                anchor: TextAnchor::TopLeft,
            },
            legend: LegendBox { x1: 0.70, y1: 0.70, x2: 0.78, y2: 0.85, text_size: 20.0 },
            output: OutputPaths::default(),
            post: PostProcessStyle::default(),
        }
    }

    /// M_H = 400, 700, 1000 GeV, unscaled, linear y.
    pub fn higgs_mass_scan() -> Self {
        let run = |n: &str| {
            PathBuf::from(format!(
                "../bin/template_h_decay/Events/run_{n}_decayed_1/unweighted_events.root"
            ))
        };
        Self {
            preset: Preset::HiggsMassScan,
            inputs: [run("01"), run("02"), run("03")],
            scale_factors: [1.0; 3],
            colors: strings([K_RED, K_BLUE, K_GREEN]),
            legend_labels: strings(["M_{H} = 400 GeV", "M_{H} = 700 GeV", "M_{H} = 1000 GeV"]),
            frame_series: 0,
            canvas: CanvasSize::square(),
            pad: PadStyle {
                margins: Margins { left: 0.15, ..Margins::default() },
                ..PadStyle::default()
            },
            y_title: EVENTS_TITLE.into(),
            x_axis_labels: LabelRules::kinematics_verbose(),
            particle_labels: LabelRules::particles(),
            extra_params: vec!["M_{a} = 200 GeV".into(), "M_{#chi}= 10 GeV".into()],
            annotation: AnnotationLayout::default(),
            legend: LegendBox::default(),
            output: OutputPaths {
                comparison: "histogram_h_decay1_comparison.json".into(),
                modified: "modified_histogram_h_decay1_comparison.json".into(),
                pdf: "output_h_decay1.pdf".into(),
            },
            post: PostProcessStyle {
                x_axis_labels: LabelRules::kinematics_verbose(),
                page_title: "Dark Matter Production via gluon fusion and higgs decay".into(),
                ..PostProcessStyle::default()
            },
        }
    }

    /// Start from `preset` and apply the keys present in `yaml`.
    ///
    /// Nested mappings merge key by key; any other value replaces the preset's.
    /// A top-level `preset:` key selects the base preset instead of `preset`.
    pub fn resolve(preset: Preset, yaml: Option<&str>) -> Result<Self> {
        let Some(yaml) = yaml else {
            return Ok(preset.config());
        };
        let overrides: Value = serde_yaml_ng::from_str(yaml)?;
        let base = match overrides.get("preset") {
            Some(p) => serde_yaml_ng::from_value::<Preset>(p.clone())?,
            None => preset,
        };
        let mut merged = serde_yaml_ng::to_value(base.config())?;
        if !overrides.is_null() {
            merge(&mut merged, overrides);
        }
        let config: Self = serde_yaml_ng::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// [`resolve`](Self::resolve) with the YAML read from `path`.
    pub fn load(preset: Preset, path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::resolve(preset, Some(&yaml))
    }

    /// Reject settings the comparator cannot work with.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(VizError::Core(hc_core::Error::Config(msg)));
        if self.frame_series > 2 {
            return bad(format!("frame_series must be 0, 1 or 2, got {}", self.frame_series));
        }
        if let Some(f) = self.scale_factors.iter().find(|f| !f.is_finite()) {
            return bad(format!("scale factor {f} is not finite"));
        }
        let l = &self.legend;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(l.x1) && in_unit(l.x2) && in_unit(l.y1) && in_unit(l.y2))
            || l.x1 >= l.x2
            || l.y1 >= l.y2
        {
            return bad(format!(
                "legend box ({}, {}, {}, {}) is not inside the canvas",
                l.x1, l.y1, l.x2, l.y2
            ));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return bad("canvas size must be non-zero".into());
        }
        Ok(())
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Mapping(base), Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_tan_beta() {
        let c = ComparisonConfig::default();
        assert_eq!(c.preset, Preset::TanBetaScan);
        assert_eq!(c.frame_series, 1);
        assert!(c.pad.log_y);
        assert_eq!(c.scale_factors[0], 0.03401011318);
        assert_eq!(c.output.pdf, PathBuf::from("output_tan_norm.pdf"));
        c.validate().unwrap();
    }

    #[test]
    fn higgs_preset() {
        let c = Preset::HiggsMassScan.config();
        assert_eq!(c.scale_factors, [1.0; 3]);
        assert!(!c.pad.log_y);
        assert_eq!(c.pad.margins.left, 0.15);
        assert_eq!(c.pad.margins.right, 0.1);
        assert_eq!(c.x_axis_labels.resolve("higgs_pt"), Some("Transverse Momentum (p_t) [GeV]"));
        assert_eq!(c.post.page_title, "Dark Matter Production via gluon fusion and higgs decay");
        c.validate().unwrap();
    }

    #[test]
    fn row_layout_advances_right() {
        let l = ComparisonConfig::tan_beta_scan().annotation;
        let p = l.positions(true, 2);
        assert_eq!(p.len(), 3);
        assert!((p[1][0] - 0.45).abs() < 1e-12);
        assert!((p[2][0] - 0.65).abs() < 1e-12);
        assert!(p.iter().all(|q| q[1] == 0.94));
    }

    #[test]
    fn column_layout_without_label() {
        let p = AnnotationLayout::default().positions(false, 2);
        assert_eq!(p[0], [0.18, 0.82]);
        assert!((p[1][1] - 0.77).abs() < 1e-12);
    }

    #[test]
    fn yaml_overrides_merge_into_preset() {
        let yaml = "
scale_factors: [1.0, 2.0, 3.0]
pad:
  log_y: false
legend_labels: ['a', 'b', 'c']
";
        let c = ComparisonConfig::resolve(Preset::TanBetaScan, Some(yaml)).unwrap();
        assert_eq!(c.scale_factors, [1.0, 2.0, 3.0]);
        assert!(!c.pad.log_y);
        // untouched nested keys keep the preset values
        assert!(c.pad.ticks_all_sides);
        assert_eq!(c.pad.margins.top, 0.10);
        assert_eq!(c.legend_labels[2], "c");
        assert_eq!(c.frame_series, 1);
    }

    #[test]
    fn yaml_can_switch_preset() {
        let c = ComparisonConfig::resolve(Preset::TanBetaScan, Some("preset: higgs_mass_scan\n"))
            .unwrap();
        assert_eq!(c.preset, Preset::HiggsMassScan);
        assert_eq!(c.frame_series, 0);
    }

    #[test]
    fn label_rules_override_replaces_list() {
        let yaml = "x_axis_labels:\n  - { pattern: pt, label: 'p_{T}' }\n";
        let c = ComparisonConfig::resolve(Preset::TanBetaScan, Some(yaml)).unwrap();
        assert_eq!(c.x_axis_labels.len(), 1);
        assert_eq!(c.x_axis_labels.resolve("higgs_pt"), Some("p_{T}"));
    }

    #[test]
    fn invalid_frame_series() {
        let err = ComparisonConfig::resolve(Preset::TanBetaScan, Some("frame_series: 3\n"));
        assert!(matches!(err, Err(VizError::Core(hc_core::Error::Config(_)))));
    }

    #[test]
    fn empty_mapping_is_the_preset() {
        let c = ComparisonConfig::resolve(Preset::HiggsMassScan, Some("{}")).unwrap();
        assert_eq!(c, ComparisonConfig::higgs_mass_scan());
    }
}
