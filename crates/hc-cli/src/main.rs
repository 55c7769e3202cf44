//! hepcmp CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hc_core::{TableFormat, read_table, resolve_input};
use hc_viz::{ComparisonConfig, CurveArtifact, CurveStyle, Preset};
use hc_viz_render::MultiPageDocument;
use hc_viz_render::config::{VizConfig, resolve_config};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hepcmp")]
#[command(about = "hepcmp - sweep curves and histogram comparisons")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    /// Render settings (YAML): figure scale, fonts, axes, output dpi
    #[arg(long, global = true)]
    render_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plot a two-column sweep table as Mxd_vs_Weight.{png,pdf}
    Curve {
        /// Table file; `<FILE>.txt` is tried when FILE does not exist
        #[arg(default_value = "x_section")]
        file: PathBuf,

        /// Common heavy-Higgs mass shown in the title, in GeV
        #[arg(long, default_value = "700")]
        mass: f64,

        /// PNG resolution (72 = one pixel per canvas pixel)
        #[arg(long)]
        dpi: Option<u32>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Overlay histograms from three files, then restyle them into a PDF
    Compare {
        /// Built-in comparison setup
        #[arg(long, value_enum, default_value = "tan-beta")]
        preset: PresetArg,

        /// YAML overrides applied on top of the preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// The three input files (.root or plot container .json)
        #[arg(long, num_args = 3, value_names = ["FIRST", "SECOND", "THIRD"])]
        input: Option<Vec<PathBuf>>,

        /// Raster resolution; the PDF pages are vector and ignore it
        #[arg(long)]
        dpi: Option<u32>,

        /// Directory receiving the containers and the PDF
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    TanBeta,
    HiggsMass,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::TanBeta => Preset::TanBetaScan,
            PresetArg::HiggsMass => Preset::HiggsMassScan,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();

    let render = load_render_config(cli.render_config.as_deref())?;

    match cli.command {
        Commands::Curve { file, mass, dpi, out_dir } => {
            cmd_curve(&file, mass, &out_dir, with_dpi(render, dpi)?)
        }
        Commands::Compare { preset, config, input, dpi, out_dir } => cmd_compare(
            preset.into(),
            config.as_deref(),
            input,
            &out_dir,
            with_dpi(render, dpi)?,
        ),
    }
}

fn load_render_config(path: Option<&Path>) -> Result<VizConfig> {
    let Some(path) = path else {
        return Ok(VizConfig::default());
    };
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read render config {}", path.display()))?;
    resolve_config(Some(&yaml)).with_context(|| format!("invalid render config {}", path.display()))
}

fn with_dpi(mut config: VizConfig, dpi: Option<u32>) -> Result<VizConfig> {
    if let Some(dpi) = dpi {
        anyhow::ensure!(dpi > 0, "--dpi must be positive");
        config.output.dpi = dpi;
    }
    Ok(config)
}

fn cmd_curve(file: &Path, mass: f64, out_dir: &Path, render: VizConfig) -> Result<()> {
    anyhow::ensure!(mass.is_finite(), "--mass must be finite");
    let format = TableFormat::default();
    let resolved = resolve_input(file, &format.default_extension)?;
    let series = read_table(&resolved, &format)?;

    let style = CurveStyle { mass, ..CurveStyle::default() };
    let artifact = CurveArtifact::from_series(&series, &style);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let written = hc_viz_render::save_curve(&artifact, out_dir, &["png", "pdf"], &render)
        .context("failed to render the sweep curve")?;

    let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    tracing::info!("Plot saved as {}", names.join(" and "));
    tracing::info!("Data read from {}", resolved.display());
    Ok(())
}

fn cmd_compare(
    preset: Preset,
    config: Option<&Path>,
    input: Option<Vec<PathBuf>>,
    out_dir: &Path,
    render: VizConfig,
) -> Result<()> {
    let mut cfg = match config {
        Some(path) => ComparisonConfig::load(preset, path)
            .with_context(|| format!("failed to load comparison config {}", path.display()))?,
        None => ComparisonConfig::resolve(preset, None)?,
    };
    if let Some(input) = input {
        cfg.inputs = input
            .try_into()
            .map_err(|v: Vec<PathBuf>| anyhow::anyhow!("expected 3 inputs, got {}", v.len()))?;
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let comparison = out_dir.join(&cfg.output.comparison);
    let modified = out_dir.join(&cfg.output.modified);
    let pdf = out_dir.join(&cfg.output.pdf);

    let report = hc_viz::run_comparison(&cfg.inputs, &comparison, &cfg)
        .context("histogram comparison failed")?;
    tracing::debug!(saved = report.saved.len(), skipped = report.skipped.len(), "comparison done");

    let mut doc = MultiPageDocument::create(&pdf, &render)
        .with_context(|| format!("failed to open {}", pdf.display()))?;
    let post = hc_viz::run_postprocess(&comparison, &modified, &mut doc, &cfg.post)
        .context("post-processing failed")?;
    let pdf = doc.close().with_context(|| format!("failed to write {}", pdf.display()))?;

    if post.style_failures > 0 {
        tracing::warn!(failures = post.style_failures, "some styling steps failed");
    }
    tracing::info!(
        "Modified histograms saved to '{}' and to '{}'.",
        modified.display(),
        pdf.display()
    );
    Ok(())
}
