use serde::Deserialize;

use crate::color::Color;

/// Rendering configuration (YAML or programmatic).
///
/// Plot geometry (canvas size, margins, axis sizes) comes from the artifact;
/// this only carries what the artifacts leave to the renderer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Points per canvas pixel.
    pub scale: f64,
    pub background: Color,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self { scale: 1.0, background: Color::WHITE }
    }
}

/// Sizes are fractions of the canvas height, as in ROOT styles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    /// Plot title size.
    pub title_size: f64,
    /// Axis title size when the artifact does not set one.
    pub axis_title_size: f64,
    /// Tick label size when the artifact does not set one.
    pub axis_label_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Helvetica, Arial, Liberation Sans, sans-serif".into(),
            title_size: 0.05,
            axis_title_size: 0.035,
            axis_label_size: 0.035,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    /// Major tick length as a fraction of the frame size.
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Approximate number of labelled ticks per axis.
    pub target_ticks: usize,
    pub line_width: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            tick_length: 0.03,
            minor_tick_length: 0.015,
            target_ticks: 6,
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Raster resolution; 72 keeps one pixel per canvas point.
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 72 }
    }
}

/// Resolve a VizConfig from an optional YAML string over the defaults.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) => {
            let config: VizConfig = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            if config.output.dpi == 0 || !(config.figure.scale > 0.0) {
                return Err(crate::RenderError::Config(
                    "output.dpi and figure.scale must be positive".into(),
                ));
            }
            Ok(config)
        }
    }
}
