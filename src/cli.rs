//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Image extensions accepted as page input
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Panel segmentation and speech-bubble pre-classification for webtoon pages
#[derive(Debug, Parser)]
#[command(name = "webtoon-cut", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split pages into panels
    Split(SplitArgs),
    /// Show detected gaps and panel boundaries for one page
    Gaps(GapsArgs),
    /// Classify text snippets
    Classify(ClassifyArgs),
    /// Show version, defaults and config file locations
    Info,
}

/// Arguments for `split`
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Page image or directory of page images
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./cuts")]
    pub output: PathBuf,

    /// Panel height/width ratio (e.g. 1.0 for square panels)
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Minimum blank run height in rows
    #[arg(long)]
    pub min_gap: Option<u32>,

    /// Minimum gap height that separates panels
    #[arg(long)]
    pub min_panel_gap: Option<u32>,

    /// Config file (default: ./webtoon-cut.toml, then user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the plan without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for `gaps`
#[derive(Debug, Args)]
pub struct GapsArgs {
    /// Page image
    pub image: PathBuf,

    /// Config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `classify`
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Text snippets
    #[arg(required = true)]
    pub texts: Vec<String>,

    /// Treat snippets as floating (outside any bubble)
    #[arg(long)]
    pub floating: bool,

    /// Config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

impl SplitArgs {
    /// Whether a path has an accepted image extension
    pub fn is_image(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
    }
}
