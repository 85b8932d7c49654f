//! Configuration file support
//!
//! Settings are read from TOML. `Config::load` looks for
//! `./webtoon-cut.toml` first, then `<config dir>/webtoon-cut/config.toml`.
//! Missing sections and keys fall back to the built-in defaults, and
//! command-line flags override file values.
//!
//! ```toml
//! [split]
//! aspect_ratio = 1.0
//! min_panel_gap_height = 40
//!
//! [classifier]
//! extra_sfx_words = ["두근"]
//!
//! [analysis]
//! bubble_confidence_threshold = 0.2
//! ```

use crate::classify::ClassifierOptions;
use crate::gap::{
    GapOptions, DEFAULT_DARK_THRESHOLD, DEFAULT_LIGHT_THRESHOLD, DEFAULT_MIN_GAP_HEIGHT,
    DEFAULT_UNIFORM_THRESHOLD,
};
use crate::split::{
    SplitOptions, DEFAULT_ASPECT_RATIO, DEFAULT_EDGE_MARGIN, DEFAULT_MAX_STRETCH_FACTOR,
    DEFAULT_MIN_PANEL_GAP_HEIGHT, DEFAULT_MIN_PANEL_HEIGHT,
};
use crate::verdict::{
    AggregatorOptions, DEFAULT_BUBBLE_CONFIDENCE_THRESHOLD, DEFAULT_FLOATING_MIN_CONFIDENCE,
    DEFAULT_OCR_PADDING,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "webtoon-cut.toml";

/// Directory name under the user config directory
pub const APP_CONFIG_DIR: &str = "webtoon-cut";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// `[split]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub aspect_ratio: f64,
    pub min_panel_gap_height: u32,
    pub edge_margin: u32,
    pub min_panel_height: u32,
    pub max_stretch_factor: u32,
    pub dark_threshold: f64,
    pub light_threshold: f64,
    pub uniform_threshold: f64,
    pub min_gap_height: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            min_panel_gap_height: DEFAULT_MIN_PANEL_GAP_HEIGHT,
            edge_margin: DEFAULT_EDGE_MARGIN,
            min_panel_height: DEFAULT_MIN_PANEL_HEIGHT,
            max_stretch_factor: DEFAULT_MAX_STRETCH_FACTOR,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
            uniform_threshold: DEFAULT_UNIFORM_THRESHOLD,
            min_gap_height: DEFAULT_MIN_GAP_HEIGHT,
        }
    }
}

/// `[analysis]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub bubble_confidence_threshold: f32,
    pub ocr_padding: u32,
    pub floating_min_confidence: f32,
    pub binarize: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bubble_confidence_threshold: DEFAULT_BUBBLE_CONFIDENCE_THRESHOLD,
            ocr_padding: DEFAULT_OCR_PADDING,
            floating_min_confidence: DEFAULT_FLOATING_MIN_CONFIDENCE,
            binarize: true,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub split: SplitConfig,
    pub classifier: ClassifierOptions,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Candidate config files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_CONFIG_DIR).join("config.toml"));
        }
        paths
    }

    /// Load the first config file found; defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from_path(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(ratio) = cli.aspect_ratio {
            merged.split.aspect_ratio = ratio;
        }
        if let Some(height) = cli.min_gap_height {
            merged.split.min_gap_height = height;
        }
        if let Some(height) = cli.min_panel_gap_height {
            merged.split.min_panel_gap_height = height;
        }
        merged
    }

    /// Splitter options, with out-of-range values clamped
    pub fn split_options(&self) -> SplitOptions {
        let s = &self.split;
        let gap = GapOptions::builder()
            .dark_threshold(s.dark_threshold)
            .light_threshold(s.light_threshold)
            .uniform_threshold(s.uniform_threshold)
            .min_gap_height(s.min_gap_height)
            .build();

        SplitOptions::builder()
            .aspect_ratio(s.aspect_ratio)
            .min_panel_gap_height(s.min_panel_gap_height)
            .edge_margin(s.edge_margin)
            .min_panel_height(s.min_panel_height)
            .max_stretch_factor(s.max_stretch_factor)
            .gap_options(gap)
            .build()
    }

    /// Classifier options
    pub fn classifier_options(&self) -> ClassifierOptions {
        self.classifier.clone()
    }

    /// Aggregator options, with out-of-range values clamped
    pub fn aggregator_options(&self) -> AggregatorOptions {
        let a = &self.analysis;
        AggregatorOptions::builder()
            .bubble_confidence_threshold(a.bubble_confidence_threshold)
            .ocr_padding(a.ocr_padding)
            .floating_min_confidence(a.floating_min_confidence)
            .binarize(a.binarize)
            .build()
    }
}

/// Values given on the command line; `None` keeps the config value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub aspect_ratio: Option<f64>,
    pub min_gap_height: Option<u32>,
    pub min_panel_gap_height: Option<u32>,
}

impl CliOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any value is overridden
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
