//! Gap module core types
//!
//! Contains the gap record, detection options and error types.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Rows darker than this (mean brightness, 0-255) may be a dark gap
pub const DEFAULT_DARK_THRESHOLD: f64 = 50.0;

/// Rows brighter than this (mean brightness, 0-255) may be a light gap
pub const DEFAULT_LIGHT_THRESHOLD: f64 = 240.0;

/// Maximum row standard deviation for a row to count as uniform
pub const DEFAULT_UNIFORM_THRESHOLD: f64 = 15.0;

/// Minimum run of blank rows reported as a gap
pub const DEFAULT_MIN_GAP_HEIGHT: u32 = 10;

/// Lower clamp for brightness thresholds
const MIN_BRIGHTNESS: f64 = 0.0;

/// Upper clamp for brightness thresholds
const MAX_BRIGHTNESS: f64 = 255.0;

// ============================================================
// Error Types
// ============================================================

/// Gap detection error types
#[derive(Debug, Error)]
pub enum GapError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GapError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Gap brightness polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolarity {
    /// Black/dark separator
    Dark,
    /// White/light separator
    Light,
}

/// A maximal run of uniform rows, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gap {
    /// First blank row
    pub start: u32,
    /// Last blank row (inclusive)
    pub end: u32,
    /// Midpoint row, `(start + end) / 2`
    pub mid: u32,
    /// Number of rows, `end - start + 1`
    pub height: u32,
    /// Dark or light run
    pub polarity: GapPolarity,
}

impl Gap {
    /// Create a gap from an inclusive row range
    ///
    /// `end` is raised to `start` if given below it.
    pub fn new(start: u32, end: u32, polarity: GapPolarity) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            mid: (start + end) / 2,
            height: end - start + 1,
            polarity,
        }
    }

    /// Whether the gap is at least `min_height` rows tall
    pub fn is_at_least(&self, min_height: u32) -> bool {
        self.height >= min_height
    }
}

/// Per-row brightness statistics on a 0-255 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStats {
    /// Mean brightness
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

// ============================================================
// Options
// ============================================================

/// Gap detection options
#[derive(Debug, Clone, PartialEq)]
pub struct GapOptions {
    /// Dark row threshold (mean brightness below)
    pub dark_threshold: f64,
    /// Light row threshold (mean brightness above)
    pub light_threshold: f64,
    /// Uniformity threshold (row standard deviation below)
    pub uniform_threshold: f64,
    /// Minimum gap height in rows
    pub min_gap_height: u32,
}

impl Default for GapOptions {
    fn default() -> Self {
        Self {
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
            uniform_threshold: DEFAULT_UNIFORM_THRESHOLD,
            min_gap_height: DEFAULT_MIN_GAP_HEIGHT,
        }
    }
}

impl GapOptions {
    /// Create a new options builder
    pub fn builder() -> GapOptionsBuilder {
        GapOptionsBuilder::default()
    }

    /// Whether a row with these statistics is blank
    pub fn is_blank(&self, stats: &RowStats) -> bool {
        let uniform = stats.std_dev < self.uniform_threshold;
        uniform && (stats.mean < self.dark_threshold || stats.mean > self.light_threshold)
    }
}

/// Builder for GapOptions
#[derive(Debug, Default)]
pub struct GapOptionsBuilder {
    options: GapOptions,
}

impl GapOptionsBuilder {
    /// Set dark threshold (clamped to 0-255)
    #[must_use]
    pub fn dark_threshold(mut self, threshold: f64) -> Self {
        self.options.dark_threshold = threshold.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        self
    }

    /// Set light threshold (clamped to 0-255)
    #[must_use]
    pub fn light_threshold(mut self, threshold: f64) -> Self {
        self.options.light_threshold = threshold.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        self
    }

    /// Set uniformity threshold (clamped to 0-255)
    #[must_use]
    pub fn uniform_threshold(mut self, threshold: f64) -> Self {
        self.options.uniform_threshold = threshold.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        self
    }

    /// Set minimum gap height (at least 1 row)
    #[must_use]
    pub fn min_gap_height(mut self, height: u32) -> Self {
        self.options.min_gap_height = height.max(1);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> GapOptions {
        self.options
    }
}
