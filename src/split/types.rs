//! Split module core types
//!
//! Contains options, boundary sequences and per-panel records.

use crate::gap::{Gap, GapOptions};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default height/width ratio of a panel (9:16 portrait)
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Minimum gap height separating two panels
pub const DEFAULT_MIN_PANEL_GAP_HEIGHT: u32 = 40;

/// Distance from the page edge within which a panel gap is a margin
pub const DEFAULT_EDGE_MARGIN: u32 = 50;

/// Panels shorter than this are dropped as residual noise
pub const DEFAULT_MIN_PANEL_HEIGHT: u32 = 30;

/// How far past the budget (in budgets) the next gap may be
pub const DEFAULT_MAX_STRETCH_FACTOR: u32 = 2;

/// Aspect ratio clamp range
const MIN_ASPECT_RATIO: f64 = 0.1;
const MAX_ASPECT_RATIO: f64 = 20.0;

// ============================================================
// Error Types
// ============================================================

/// Page splitting error types
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Failed to save panel {path}: {reason}")]
    SaveFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Ordered cut rows for one page
///
/// Panels are the half-open spans `[b[i], b[i+1])`. The sequence is strictly
/// increasing and bounded by the page height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelBoundaries {
    /// Boundary rows
    pub rows: Vec<u32>,
    /// Page height the boundaries were computed for
    pub page_height: u32,
    /// Height budget used while splitting
    pub max_panel_height: u32,
}

impl PanelBoundaries {
    /// Number of spans between boundaries
    pub fn span_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Iterate `(start, end)` spans
    pub fn spans(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows.windows(2).map(|w| (w[0], w[1]))
    }

    /// Spans kept as panels (at least `min_height` rows), numbered from 1
    pub fn panels(&self, min_height: u32) -> Vec<PanelSpan> {
        self.spans()
            .filter(|(start, end)| end - start >= min_height)
            .enumerate()
            .map(|(i, (start_y, end_y))| PanelSpan {
                index: i + 1,
                start_y,
                end_y,
            })
            .collect()
    }

    /// Strictly increasing and within `[0, page_height]`
    pub fn is_valid(&self) -> bool {
        self.rows.windows(2).all(|w| w[0] < w[1])
            && self.rows.last().map_or(true, |&last| last <= self.page_height)
    }
}

/// One kept panel of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSpan {
    /// 1-based panel number on the page
    pub index: usize,
    /// First row (inclusive)
    pub start_y: u32,
    /// Last row (exclusive)
    pub end_y: u32,
}

impl PanelSpan {
    /// Panel height in rows
    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }
}

/// In-memory split of one page
#[derive(Debug, Clone, Serialize)]
pub struct PageSplit {
    /// Page size (width, height)
    pub page_size: (u32, u32),
    /// All detected gaps
    pub gaps: Vec<Gap>,
    /// Cut rows
    pub boundaries: PanelBoundaries,
    /// Spans kept as panels
    pub panels: Vec<PanelSpan>,
}

impl PageSplit {
    /// Panels taller than the height budget
    pub fn oversized(&self) -> usize {
        self.panels
            .iter()
            .filter(|p| p.height() > self.boundaries.max_panel_height)
            .count()
    }
}

/// Result of splitting one page file to disk
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    /// Source page
    pub source: PathBuf,
    /// Page size (width, height)
    pub page_size: (u32, u32),
    /// Height budget
    pub max_panel_height: u32,
    /// Cut rows
    pub boundaries: Vec<u32>,
    /// Written panel images, in page order
    pub outputs: Vec<PathBuf>,
    /// Panels taller than the budget
    pub oversized: usize,
}

// ============================================================
// Options
// ============================================================

/// Page splitting options
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Panel height/width ratio; the height budget is `width * aspect_ratio`
    pub aspect_ratio: f64,
    /// Minimum gap height that separates panels
    pub min_panel_gap_height: u32,
    /// Panel gaps this close to the top/bottom edge are page margins
    pub edge_margin: u32,
    /// Spans shorter than this produce no panel
    pub min_panel_height: u32,
    /// Maximum stretch past the budget, in budgets
    pub max_stretch_factor: u32,
    /// Gap detection options
    pub gap: GapOptions,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            min_panel_gap_height: DEFAULT_MIN_PANEL_GAP_HEIGHT,
            edge_margin: DEFAULT_EDGE_MARGIN,
            min_panel_height: DEFAULT_MIN_PANEL_HEIGHT,
            max_stretch_factor: DEFAULT_MAX_STRETCH_FACTOR,
            gap: GapOptions::default(),
        }
    }
}

impl SplitOptions {
    /// Create a new options builder
    pub fn builder() -> SplitOptionsBuilder {
        SplitOptionsBuilder::default()
    }

    /// Square panels (1:1)
    pub fn square() -> Self {
        Self {
            aspect_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Height budget for a page of the given width (at least 1 row)
    pub fn max_panel_height(&self, width: u32) -> u32 {
        ((width as f64 * self.aspect_ratio) as u32).max(1)
    }
}

/// Builder for SplitOptions
#[derive(Debug, Default)]
pub struct SplitOptionsBuilder {
    options: SplitOptions,
}

impl SplitOptionsBuilder {
    /// Set aspect ratio (height/width, clamped to 0.1-20)
    #[must_use]
    pub fn aspect_ratio(mut self, ratio: f64) -> Self {
        self.options.aspect_ratio = ratio.clamp(MIN_ASPECT_RATIO, MAX_ASPECT_RATIO);
        self
    }

    /// Set minimum panel gap height
    #[must_use]
    pub fn min_panel_gap_height(mut self, height: u32) -> Self {
        self.options.min_panel_gap_height = height;
        self
    }

    /// Set edge margin
    #[must_use]
    pub fn edge_margin(mut self, margin: u32) -> Self {
        self.options.edge_margin = margin;
        self
    }

    /// Set minimum panel height
    #[must_use]
    pub fn min_panel_height(mut self, height: u32) -> Self {
        self.options.min_panel_height = height;
        self
    }

    /// Set stretch factor (at least 1)
    #[must_use]
    pub fn max_stretch_factor(mut self, factor: u32) -> Self {
        self.options.max_stretch_factor = factor.max(1);
        self
    }

    /// Set gap detection options
    #[must_use]
    pub fn gap_options(mut self, gap: GapOptions) -> Self {
        self.options.gap = gap;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> SplitOptions {
        self.options
    }
}
