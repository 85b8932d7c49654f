//! Gap Detection module
//!
//! Finds runs of visually uniform ("blank") rows in a page image. These runs
//! are the candidate boundaries used by the [`split`](crate::split) module.
//!
//! # Algorithm
//!
//! 1. Convert the page to grayscale
//! 2. Compute per-row mean brightness and standard deviation
//! 3. Mark a row blank when it is uniform and either dark or light
//! 4. Merge consecutive blank rows and drop runs shorter than `min_gap_height`
//!
//! # Example
//!
//! ```rust,no_run
//! use webtoon_cut::{GapDetector, GapOptions};
//! use std::path::Path;
//!
//! let options = GapOptions::builder().min_gap_height(10).build();
//! let gaps = GapDetector::detect_from_path(Path::new("page.png"), &options).unwrap();
//!
//! for gap in &gaps {
//!     println!("{}..={} ({:?})", gap.start, gap.end, gap.polarity);
//! }
//! ```

// Submodules
mod detect;
mod types;

// Re-export public API
pub use detect::GapDetector;
pub use types::{
    Gap, GapError, GapOptions, GapOptionsBuilder, GapPolarity, Result, RowStats,
    DEFAULT_DARK_THRESHOLD, DEFAULT_LIGHT_THRESHOLD, DEFAULT_MIN_GAP_HEIGHT,
    DEFAULT_UNIFORM_THRESHOLD,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_gap_options_default() {
        let opts = GapOptions::default();
        assert_eq!(opts.min_gap_height, DEFAULT_MIN_GAP_HEIGHT);
        assert_eq!(opts.dark_threshold, DEFAULT_DARK_THRESHOLD);
    }

    #[test]
    fn test_error_types() {
        let _err1 = GapError::ImageNotFound(PathBuf::from("/test"));
        let _err2 = GapError::InvalidImage("bad header".to_string());
        let _err3: GapError = std::io::Error::other("test").into();
    }
}
