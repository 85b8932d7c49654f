//! Ratio-Constrained Page Splitting module
//!
//! Converts detected gaps into panel boundaries that honor a maximum panel
//! height derived from a target aspect ratio, then crops the panels.
//!
//! # Algorithm
//!
//! 1. Gaps at least `min_panel_gap_height` tall are panel dividers; a divider
//!    near the top or bottom edge is treated as page margin and trimmed
//! 2. Walk down the page: if the rest fits in the budget, close the page
//! 3. Otherwise cut at the latest gap whose midpoint is inside the budget
//! 4. Without one, stretch to the next gap if it is within
//!    `max_stretch_factor` budgets, else hard-cut at the budget ceiling
//! 5. A page without any gap is tiled every `max_panel_height` rows
//! 6. Spans shorter than `min_panel_height` produce no panel
//!
//! # Example
//!
//! ```rust,no_run
//! use webtoon_cut::{PageSplitter, SplitOptions};
//! use std::path::Path;
//!
//! let options = SplitOptions::builder()
//!     .aspect_ratio(16.0 / 9.0)
//!     .min_panel_gap_height(40)
//!     .build();
//!
//! let result = PageSplitter::new(options)
//!     .split_file(Path::new("page_001.png"), Path::new("cuts"))
//!     .unwrap();
//! println!("{} panels, boundaries {:?}", result.outputs.len(), result.boundaries);
//! ```

// Submodules
mod crop;
mod ratio;
mod types;

// Re-export public API
pub use crop::PageSplitter;
pub use ratio::RatioSplitter;
pub use types::{
    PageSplit, PanelBoundaries, PanelSpan, Result, SplitError, SplitOptions, SplitOptionsBuilder,
    SplitResult, DEFAULT_ASPECT_RATIO, DEFAULT_EDGE_MARGIN, DEFAULT_MAX_STRETCH_FACTOR,
    DEFAULT_MIN_PANEL_GAP_HEIGHT, DEFAULT_MIN_PANEL_HEIGHT,
};
