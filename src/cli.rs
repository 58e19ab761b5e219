//! Command-line interface for msdf-text.
//!
//! Subcommands build an atlas from a font and write its debug artifacts,
//! lay out a string against a freshly built atlas, or write the default
//! configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use glam::Vec2;

use msdf_text_atlas::{AtlasBuilder, FontAtlas};
use msdf_text_config::{AtlasConfig, ColoringStrategy, LogLevel};
use msdf_text_fonts::{FontFace, FontLibrary};
use msdf_text_render::{TextStyle, VertexBatch, layout_text, measure_text};

use crate::output;

/// msdf-text - Multi-channel signed distance field font atlas builder
#[derive(Parser, Debug)]
#[command(name = "msdf-text")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace); takes precedence over RUST_LOG
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Also write log output to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an atlas and write atlas.png and atlas.json
    Build {
        /// Font file path, or the family name of an installed font
        font: String,

        #[command(flatten)]
        atlas: AtlasArgs,

        /// Directory receiving the artifacts
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Lay out a string and print the emitted quad count and extent
    Layout {
        /// Font file path, or the family name of an installed font
        font: String,

        /// Text to lay out
        text: String,

        /// Font size in pixels
        #[arg(long, value_name = "PX", default_value_t = 32.0)]
        size: f32,

        #[command(flatten)]
        atlas: AtlasArgs,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination (default: ~/.config/msdf-text/atlas.yaml)
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Atlas options shared by `build` and `layout`; flags override the config file
#[derive(Args, Debug, Clone, Default)]
pub struct AtlasArgs {
    /// YAML configuration file (default: ~/.config/msdf-text/atlas.yaml if present)
    #[arg(long, value_name = "YAML")]
    pub config: Option<PathBuf>,

    /// Pixels per em
    #[arg(long, value_name = "PX")]
    pub em_size: Option<f64>,

    /// Signed distance range in atlas pixels
    #[arg(long, value_name = "PX")]
    pub pixel_range: Option<f64>,

    /// Rasterizer worker threads
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Edge coloring strategy (simple, ink-trap, by-distance)
    #[arg(long, value_name = "STRATEGY", value_parser = parse_coloring)]
    pub coloring: Option<ColoringStrategy>,
}

impl AtlasArgs {
    /// Load the base configuration and apply the command-line overrides.
    pub fn resolve_config(&self) -> Result<AtlasConfig> {
        let base = match &self.config {
            Some(path) => AtlasConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => AtlasConfig::load_or_default(&AtlasConfig::config_path())
                .context("failed to load the default config file")?,
        };
        Ok(self.apply(base))
    }

    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, mut config: AtlasConfig) -> AtlasConfig {
        if let Some(em_size) = self.em_size {
            config = config.with_em_size(em_size);
        }
        if let Some(pixel_range) = self.pixel_range {
            config = config.with_pixel_range(pixel_range);
        }
        if let Some(workers) = self.workers {
            config = config.with_worker_count(workers);
        }
        if let Some(coloring) = self.coloring {
            config = config.with_coloring(coloring);
        }
        config
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| {
        format!("unknown log level '{value}' (expected off, error, warn, info, debug or trace)")
    })
}

fn parse_coloring(value: &str) -> Result<ColoringStrategy, String> {
    match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "simple" => Ok(ColoringStrategy::Simple),
        "ink-trap" | "inktrap" => Ok(ColoringStrategy::InkTrap),
        "by-distance" | "distance" => Ok(ColoringStrategy::ByDistance),
        _ => Err(format!(
            "unknown coloring strategy '{value}' (expected simple, ink-trap or by-distance)"
        )),
    }
}

/// Execute the parsed command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            font,
            atlas,
            out_dir,
        } => {
            let config = atlas.resolve_config()?;
            let built = build_atlas(&font, config)?;
            print_report(&built);

            let paths = output::write_artifacts(&built, &out_dir)?;
            if let Some(image) = &paths.image {
                println!("Atlas image:  {}", image.display());
            }
            println!("Atlas layout: {}", paths.layout.display());
            Ok(())
        }
        Commands::Layout {
            font,
            text,
            size,
            atlas,
        } => {
            if !(size.is_finite() && size > 0.0) {
                bail!("font size must be a positive number of pixels, got {size}");
            }
            let config = atlas.resolve_config()?;
            let built = build_atlas(&font, config)?;

            let mut batch = VertexBatch::new();
            let vertices = layout_text(
                &built.geometry,
                Vec2::ZERO,
                &text,
                &TextStyle::new(size),
                &mut batch,
            );
            let extent = measure_text(&built.geometry, &text, size);
            println!(
                "{} quads ({} vertices), extent {:.1}x{:.1} px over {} line(s)",
                vertices / 6,
                vertices,
                extent.width,
                extent.height,
                extent.lines
            );
            Ok(())
        }
        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(AtlasConfig::config_path);
            init_config(&path, force)?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

/// Open a font by file path, falling back to an installed family name
fn load_font(font: &str) -> Result<FontFace> {
    let mut library = FontLibrary::new();
    let path = Path::new(font);
    if path.is_file() {
        library
            .load_font(path)
            .with_context(|| format!("failed to load font {}", path.display()))
    } else {
        library
            .load_system_font(font)
            .with_context(|| format!("no font file or installed family named '{font}'"))
    }
}

fn build_atlas(font: &str, config: AtlasConfig) -> Result<FontAtlas> {
    let face = load_font(font)?;
    let builder = AtlasBuilder::new(config).context("invalid atlas configuration")?;
    builder
        .build(&face)
        .with_context(|| format!("failed to build atlas for '{font}'"))
}

fn print_report(atlas: &FontAtlas) {
    let report = &atlas.report;
    println!(
        "Built {}x{} atlas at {:.2} px/em: {} glyphs, {} missing, {} dropped",
        report.width,
        report.height,
        report.em_size,
        report.loaded.len(),
        report.missing.len(),
        report.dropped.len()
    );
    if report.relaxation_steps > 0 {
        println!("Scale relaxed {} time(s) to fit", report.relaxation_steps);
    }
    if !report.degenerate.is_empty() {
        println!("Degenerate outlines: {:?}", report.degenerate);
    }
}

/// Write the default configuration to `path`, refusing to clobber an
/// existing file unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AtlasConfig::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
